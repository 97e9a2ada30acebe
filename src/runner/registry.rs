use crate::runner::{Benchmark, BenchmarkInfo};
use crate::shape::{ArrayElement, ValueShape};
use crate::sweep::{AllocationSweep, ArraySweep};
use crate::tree::TreeBenchmark;
use crate::{HarnessConfig, HarnessError};

/// Ordered list of benchmarks. Run order is registration order.
#[derive(Debug, Default)]
pub struct BenchmarkRegistry {
    entries: Vec<Box<dyn Benchmark>>,
}

impl BenchmarkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The fixed workload list: one value sweep per shape, one array sweep
    /// per element kind, then the tree benchmark.
    pub fn standard(config: &HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let mut registry = Self::new();
        for shape in ValueShape::ALL {
            registry.register(AllocationSweep::new(shape, config.sweep)?);
        }
        for element in ArrayElement::ALL {
            registry.register(ArraySweep::new(element, config.arrays)?);
        }
        registry.register(TreeBenchmark::new(config.tree.clone())?);
        Ok(registry)
    }

    /// Append a benchmark and return its position.
    pub fn register<B>(&mut self, benchmark: B) -> usize
    where
        B: Benchmark + 'static,
    {
        self.entries.push(Box::new(benchmark));
        self.entries.len() - 1
    }

    /// Keep only the named benchmarks, preserving registry order.
    pub fn retain_named<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), HarnessError> {
        for name in names {
            let name: &str = name.as_ref();
            if self.get(name).is_none() {
                return Err(HarnessError::UnknownBenchmark(name.to_string()));
            }
        }
        self.entries
            .retain(|b| names.iter().any(|name| name.as_ref() == b.name()));
        Ok(())
    }

    /// Look up a benchmark by name.
    pub fn get(&self, name: &str) -> Option<&dyn Benchmark> {
        self.entries
            .iter()
            .find(|b| b.name() == name)
            .map(|b| &**b)
    }

    /// Describe all registered benchmarks, in run order.
    pub fn list(&self) -> Vec<BenchmarkInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, b)| BenchmarkInfo {
                index,
                name: b.name().to_string(),
                description: b.description(),
            })
            .collect()
    }

    /// Number of registered benchmarks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Benchmark>> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let registry = BenchmarkRegistry::standard(&HarnessConfig::default()).unwrap();
        let names: Vec<_> = registry.list().into_iter().map(|i| i.name).collect();

        assert_eq!(names.len(), ValueShape::ALL.len() + ArrayElement::ALL.len() + 1);
        assert_eq!(names[0], "alloc_sweep/empty");
        assert_eq!(names[ValueShape::ALL.len()], "array_sweep/int");
        assert_eq!(names.last().map(String::as_str), Some("gc_bench"));
    }

    #[test]
    fn test_retain_named_keeps_registry_order() {
        let mut registry = BenchmarkRegistry::standard(&HarnessConfig::default()).unwrap();
        registry
            .retain_named(&["gc_bench", "alloc_sweep/one_int"])
            .unwrap();
        let names: Vec<_> = registry.list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["alloc_sweep/one_int", "gc_bench"]);
    }

    #[test]
    fn test_retain_unknown_name_fails() {
        let mut registry = BenchmarkRegistry::standard(&HarnessConfig::default()).unwrap();
        let err = registry.retain_named(&["nope"]).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownBenchmark(name) if name == "nope"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_by_name() {
        let registry = BenchmarkRegistry::standard(&HarnessConfig::default()).unwrap();
        assert!(registry.get("array_sweep/reference").is_some());
        assert!(registry.get("array_sweep/char").is_none());
    }
}
