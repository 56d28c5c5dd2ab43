/// Declares an op marker plus its phase enum. Every phase span is named
/// after the phase and carries the op name as a field.
macro_rules! op_marker {
    ($op:ident, $name:literal, [$($phase:ident => $pname:literal),+ $(,)?]) => {
        #[derive(Copy, Clone, Debug)]
        pub struct $op;

        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum Phase { $($phase),+ }

        impl Phase {
            #[cfg(test)]
            pub const ALL: &'static [Phase] = &[$(Phase::$phase),+];
        }

        impl $crate::telemetry::ctx::PhaseSpan for Phase {
            fn name(&self) -> &'static str {
                match self { $(Phase::$phase => $pname),+ }
            }
            fn span(&self) -> tracing::Span {
                match self { $(Phase::$phase => tracing::info_span!($pname, op = $name)),+ }
            }
        }

        impl $crate::telemetry::ctx::OpMarker for $op {
            const NAME: &'static str = $name;
            type Phase = Phase;
            fn root_span() -> tracing::Span { tracing::info_span!($name) }
        }
    };
}

pub mod init;
pub mod shopping;
pub mod serve;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::telemetry::ctx::{OpMarker, PhaseSpan};

    fn names<P: PhaseSpan>(all: &[P]) -> Vec<&'static str> {
        all.iter().map(PhaseSpan::name).collect()
    }

    #[test]
    fn shopping_phases_follow_the_pipeline() {
        assert_eq!(shopping::Shopping::NAME, "shopping");
        assert_eq!(
            names(shopping::Phase::ALL),
            ["validate", "fetch_ingredients", "aggregate", "resolve_list", "append_items"]
        );
    }

    #[test]
    fn phase_names_are_unique_per_op() {
        for all in [names(init::Phase::ALL), names(shopping::Phase::ALL), names(serve::Phase::ALL)] {
            let unique: HashSet<_> = all.iter().collect();
            assert_eq!(unique.len(), all.len());
        }
        assert_eq!(init::Init::NAME, "init");
        assert_eq!(serve::Serve::NAME, "serve");
    }
}
