//! Proc class registry and factory for tejido graphs.
//!
//! This crate provides a centralized registry for discovering and
//! instantiating processing nodes. It enables graph construction by class
//! name — a description document names `"onepole"` and the registry builds
//! the node — and exposes each class's declared parameter and port name
//! lists for validation and UI generation.
//!
//! Registration happens deterministically inside [`ProcRegistry::new`], not
//! at static-initialization time, so there is no initialization-order
//! hazard: build the registry once, before any graph, and hand it to
//! whatever loads descriptions.
//!
//! # Example
//!
//! ```rust
//! use tejido_core::Proc;
//! use tejido_registry::ProcRegistry;
//!
//! let registry = ProcRegistry::new();
//!
//! // List all proc classes
//! for class in registry.all_procs() {
//!     println!("{}: {}", class.class, class.description);
//! }
//!
//! // Create a proc by class name
//! let onepole = registry.create("onepole").unwrap();
//! assert_eq!(onepole.info().class().as_str(), "onepole");
//! ```
//!
//! The `ringbuffer` signal-tap class is deliberately absent: taps are
//! created through `Container::add_signal_tap`, which pairs the proc with
//! its unique reader handle.

use tejido_core::Proc;
use tejido_core::procs::{Add, DcBlocker, DelayInput, Gain, Multiply, OnePole, Resample};

/// Category of proc class, for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcCategory {
    /// Filters and spectral shaping.
    Filter,
    /// Arithmetic and gain staging.
    Utility,
    /// History buffers and backward-path transport.
    Transport,
}

impl ProcCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            ProcCategory::Filter => "Filter",
            ProcCategory::Utility => "Utility",
            ProcCategory::Transport => "Transport",
        }
    }
}

/// Describes a proc class in the registry.
#[derive(Debug, Clone)]
pub struct ProcDescriptor {
    /// Unique class name (lowercase, no spaces).
    pub class: &'static str,
    /// Brief description of the proc.
    pub description: &'static str,
    /// Category for organization.
    pub category: ProcCategory,
    /// Declared parameter names.
    pub params: &'static [&'static str],
    /// Declared input port names, in port order.
    pub inputs: &'static [&'static str],
    /// Declared output port names, in port order.
    pub outputs: &'static [&'static str],
}

/// Factory function type for creating procs.
type ProcFactory = fn() -> Box<dyn Proc>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ProcDescriptor,
    factory: ProcFactory,
}

/// Registry of all available proc classes.
///
/// The registry provides a centralized way to discover and instantiate
/// procs by class name. All built-in classes are registered on construction.
pub struct ProcRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ProcRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcRegistry {
    /// Create a new registry with all built-in proc classes registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(7),
        };
        registry.register_builtin_procs();
        registry
    }

    /// Register all built-in proc classes.
    fn register_builtin_procs(&mut self) {
        self.register(
            ProcDescriptor {
                class: "onepole",
                description: "One-pole 6 dB/oct lowpass filter",
                category: ProcCategory::Filter,
                params: &["frequency"],
                inputs: &["in"],
                outputs: &["out"],
            },
            || Box::new(OnePole::new()),
        );

        self.register(
            ProcDescriptor {
                class: "dc_blocker",
                description: "DC-blocking highpass",
                category: ProcCategory::Filter,
                params: &["f"],
                inputs: &["in"],
                outputs: &["out"],
            },
            || Box::new(DcBlocker::new()),
        );

        self.register(
            ProcDescriptor {
                class: "gain",
                description: "Scalar gain stage",
                category: ProcCategory::Utility,
                params: &["gain"],
                inputs: &["in"],
                outputs: &["out"],
            },
            || Box::new(Gain::new()),
        );

        self.register(
            ProcDescriptor {
                class: "add",
                description: "Two-input sum",
                category: ProcCategory::Utility,
                params: &[],
                inputs: &["in1", "in2"],
                outputs: &["out"],
            },
            || Box::new(Add::new()),
        );

        self.register(
            ProcDescriptor {
                class: "multiply",
                description: "Two-input product (ring modulation, VCA)",
                category: ProcCategory::Utility,
                params: &[],
                inputs: &["in1", "in2"],
                outputs: &["out"],
            },
            || Box::new(Multiply::new()),
        );

        self.register(
            ProcDescriptor {
                class: "delay_input",
                description: "Backward-path delay line writer",
                category: ProcCategory::Transport,
                params: &["length"],
                inputs: &["in"],
                outputs: &[],
            },
            || Box::new(DelayInput::new()),
        );

        self.register(
            ProcDescriptor {
                class: "resample",
                description: "Linear-interpolation block-rate converter",
                category: ProcCategory::Transport,
                params: &["up", "down"],
                inputs: &["in"],
                outputs: &["out"],
            },
            || Box::new(Resample::new()),
        );
    }

    /// Register a proc class with the registry.
    fn register(&mut self, descriptor: ProcDescriptor, factory: ProcFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered classes.
    pub fn all_procs(&self) -> Vec<&ProcDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for classes in a specific category.
    pub fn procs_in_category(&self, category: ProcCategory) -> Vec<&ProcDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by class name.
    pub fn get(&self, class: &str) -> Option<&ProcDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.class == class)
            .map(|e| &e.descriptor)
    }

    /// Create a proc instance by class name.
    ///
    /// Returns `None` if the class is not registered.
    pub fn create(&self, class: &str) -> Option<Box<dyn Proc>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.class == class)
            .map(|e| (e.factory)())
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tejido_core::Symbol;

    #[test]
    fn test_registry_creation() {
        let registry = ProcRegistry::new();
        assert_eq!(registry.len(), 7);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_class() {
        let registry = ProcRegistry::new();

        let onepole = registry.get("onepole");
        assert!(onepole.is_some());
        assert_eq!(onepole.unwrap().params, &["frequency"]);

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_create_proc() {
        let registry = ProcRegistry::new();
        let proc = registry.create("gain");
        assert!(proc.is_some());
        assert_eq!(proc.unwrap().info().class(), Symbol::new("gain"));
        assert!(registry.create("nonexistent").is_none());
    }

    #[test]
    fn test_procs_by_category() {
        let registry = ProcRegistry::new();
        assert_eq!(registry.procs_in_category(ProcCategory::Filter).len(), 2);
        assert_eq!(registry.procs_in_category(ProcCategory::Utility).len(), 3);
        assert_eq!(registry.procs_in_category(ProcCategory::Transport).len(), 2);
    }

    #[test]
    fn test_descriptors_match_instances() {
        let registry = ProcRegistry::new();
        for descriptor in registry.all_procs() {
            let proc = registry
                .create(descriptor.class)
                .unwrap_or_else(|| panic!("failed to create {}", descriptor.class));
            let info = proc.info();
            assert_eq!(info.class().as_str(), descriptor.class);
            assert_eq!(info.param_names().len(), descriptor.params.len());
            assert_eq!(info.input_names().len(), descriptor.inputs.len());
            assert_eq!(info.output_names().len(), descriptor.outputs.len());
            for (declared, built) in descriptor.inputs.iter().zip(info.input_names()) {
                assert_eq!(*declared, built.as_str());
            }
        }
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ProcCategory::Filter.name(), "Filter");
        assert_eq!(ProcCategory::Transport.name(), "Transport");
    }
}
