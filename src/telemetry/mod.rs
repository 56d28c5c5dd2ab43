pub mod config;
pub mod ctx;
pub mod ops;

use ctx::LogCtx;

// One typed context per operation; phases come from the op marker.
pub fn init() -> LogCtx<ops::init::Init> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn shopping() -> LogCtx<ops::shopping::Shopping> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn serve() -> LogCtx<ops::serve::Serve> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
