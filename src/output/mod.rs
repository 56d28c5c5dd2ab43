pub mod config;
pub mod presenter;
pub mod types;

use std::io;

use anyhow::Result;
use serde::Serialize;

use config::OutputConfig;
use presenter::Emitter;
use types::{Envelope, Payload};

pub fn emit_plan<T: Serialize>(op: &'static str, plan: &T) -> Result<()> {
    emit(Envelope::new(op, Payload::plan(plan)?))
}

pub fn emit_result<T: Serialize>(op: &'static str, result: &T, duration_ms: Option<u128>) -> Result<()> {
    emit(Envelope::new(op, Payload::result(result)?).timed(duration_ms))
}

fn emit(env: Envelope) -> Result<()> {
    let mut out = io::stdout().lock();
    Emitter::from_config(OutputConfig::resolve()).emit(&env, &mut out)?;
    Ok(())
}
