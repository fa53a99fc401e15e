use super::definitions::{BuiltinFn, all_definitions};
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Definition of a built-in function
#[derive(Debug, Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin")
    pub name: &'static str,

    /// Acceptable argument count
    pub arity: RangeInclusive<usize>,

    /// Numeric kernel used by the evaluator
    pub kind: BuiltinFn,
}

impl FunctionDefinition {
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let defs = all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());
    for def in defs {
        map.insert(def.name, def);
    }
    map
}

/// Lookup table for built-in functions
pub(crate) struct Registry;

impl Registry {
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    pub(crate) fn names() -> Vec<&'static str> {
        REGISTRY.get_or_init(init_registry).keys().copied().collect()
    }
}
