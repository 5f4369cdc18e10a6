//! Registry of gates known ahead of any declaration.
//!
//! The registry is an explicit value handed to semantic analysis and
//! lowering; there is no process-wide gate table. [`GateRegistry::standard`]
//! covers the common gate library so that typical programs need no
//! `include`, while [`GateRegistry::minimal`] starts from the bare
//! built-ins `U` and `CX` for programs that bring their own definitions.

use rustc_hash::FxHashMap;

/// How a registry gate turns into circuit events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateBehavior {
    /// A plain gate event over all arguments.
    Single,
    /// A controlled event: the first argument controls `base` on the rest.
    Controlled {
        /// Name of the gate applied to the target.
        base: String,
    },
}

/// Shape of a registry gate: parameter count, qubit count, behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSpec {
    /// Number of angle parameters.
    pub params: usize,
    /// Number of qubit arguments.
    pub qubits: usize,
    /// How applications lower.
    pub behavior: GateBehavior,
}

impl GateSpec {
    /// A plain gate taking `params` angles over `qubits` qubits.
    pub fn single(params: usize, qubits: usize) -> Self {
        GateSpec {
            params,
            qubits,
            behavior: GateBehavior::Single,
        }
    }

    /// A two-qubit controlled form of `base`.
    pub fn controlled(base: impl Into<String>) -> Self {
        GateSpec {
            params: 0,
            qubits: 2,
            behavior: GateBehavior::Controlled { base: base.into() },
        }
    }
}

/// Named gates available without declaration.
#[derive(Debug, Clone, Default)]
pub struct GateRegistry {
    gates: FxHashMap<String, GateSpec>,
}

impl GateRegistry {
    /// An empty registry; only `U` and `CX` remain usable.
    pub fn minimal() -> Self {
        GateRegistry {
            gates: FxHashMap::default(),
        }
    }

    /// The standard gate library.
    pub fn standard() -> Self {
        let mut registry = GateRegistry::minimal();

        // Single-qubit fixed gates.
        for name in ["h", "x", "y", "z", "s", "sdg", "t", "tdg"] {
            registry.register(name, GateSpec::single(0, 1));
        }

        // Single-qubit rotations.
        for name in ["rx", "ry", "rz", "u1"] {
            registry.register(name, GateSpec::single(1, 1));
        }
        registry.register("u2", GateSpec::single(2, 1));
        registry.register("u3", GateSpec::single(3, 1));

        // Controlled gates.
        registry.register("cx", GateSpec::controlled("x"));
        registry.register("cy", GateSpec::controlled("y"));
        registry.register("cz", GateSpec::controlled("z"));
        registry.register("ch", GateSpec::controlled("h"));

        // Multi-qubit plain gates.
        registry.register("swap", GateSpec::single(0, 2));
        registry.register("ccx", GateSpec::single(0, 3));

        registry
    }

    /// Add or replace a gate.
    pub fn register(&mut self, name: impl Into<String>, spec: GateSpec) {
        self.gates.insert(name.into(), spec);
    }

    /// Look up a gate by name.
    pub fn get(&self, name: &str) -> Option<&GateSpec> {
        self.gates.get(name)
    }

    /// Whether `name` is a registry gate.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    /// Number of registered gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Iterate over registered gate names.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.gates.keys().map(String::as_str)
    }

    /// Iterate over registered gates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GateSpec)> + '_ {
        self.gates.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}
