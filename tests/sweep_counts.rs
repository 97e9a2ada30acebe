use gcstress::heap::{MemoryManager, RecordingHeap};
use gcstress::runner::Benchmark;
use gcstress::{
    AllocRequest, AllocationSweep, ArrayElement, ArraySweep, ArraySweepConfig, SweepConfig,
    ValueShape,
};
use test_case::test_case;

#[test]
fn reference_value_sweep_allocates_2_4_million() {
    let mut bench = AllocationSweep::new(ValueShape::FourInts, SweepConfig::default())
        .expect("default geometry is valid");
    let mut heap = RecordingHeap::new();
    bench.run(&mut heap).expect("recording heap never fails");

    assert_eq!(heap.stats().allocations, 2_400_000);
    assert_eq!(heap.stats().collections, 1);
    assert_eq!(heap.count(&AllocRequest::Value(ValueShape::FourInts)), 2_400_000);
}

#[test]
fn reference_array_sweep_collects_once_per_length() {
    let config = ArraySweepConfig {
        sweep: SweepConfig::new(1, 2, 1).expect("valid sweep"),
        ..ArraySweepConfig::default()
    };
    let mut bench = ArraySweep::new(ArrayElement::Double, config).expect("valid geometry");
    let mut heap = RecordingHeap::new();
    bench.run(&mut heap).expect("recording heap never fails");

    assert_eq!(heap.stats().collections, 8);
    assert_eq!(bench.expected_collections(), 8);
}

#[test_case(ValueShape::Empty)]
#[test_case(ValueShape::EmptyWithSideEffect)]
#[test_case(ValueShape::OneInt)]
#[test_case(ValueShape::TwoInts)]
#[test_case(ValueShape::FourInts)]
#[test_case(ValueShape::FourLongs)]
#[test_case(ValueShape::FourFloats)]
#[test_case(ValueShape::Composite)]
#[test_case(ValueShape::Inline)]
#[test_case(ValueShape::Derived)]
fn value_sweep_matches_closed_form(shape: ValueShape) {
    let config = SweepConfig::new(3, 50, 4).expect("valid sweep");
    let mut bench = AllocationSweep::new(shape, config).expect("valid geometry");
    let mut heap = RecordingHeap::new();
    bench.run(&mut heap).expect("recording heap never fails");

    // 3 + 6 + 12 + 24 steps of four allocations.
    assert_eq!(heap.stats().allocations, 180);
    assert_eq!(heap.stats().allocations, bench.expected_allocations());
    assert_eq!(heap.stats().collections, 1);
    assert_eq!(heap.distinct_requests(), 1);
}

#[test_case(ArrayElement::Int)]
#[test_case(ArrayElement::Long)]
#[test_case(ArrayElement::Float)]
#[test_case(ArrayElement::Double)]
#[test_case(ArrayElement::Byte)]
#[test_case(ArrayElement::Reference)]
fn array_sweep_covers_every_length(element: ArrayElement) {
    let config = ArraySweepConfig {
        sweep: SweepConfig::new(2, 5, 1).expect("valid sweep"),
        max_len: 16,
    };
    let mut bench = ArraySweep::new(element, config).expect("valid geometry");
    let mut heap = RecordingHeap::new();
    bench.run(&mut heap).expect("recording heap never fails");

    for len in [1, 2, 4, 8, 16] {
        // Batch sizes 2 and 4.
        assert_eq!(heap.count(&AllocRequest::Array { element, len }), 6);
    }
    assert_eq!(heap.stats().collections, 5);
    assert_eq!(heap.stats().allocations, bench.expected_allocations());
}

#[test]
fn side_effect_shape_runs_constructor_on_system_heap() {
    let before = gcstress::shape::side_effect_count();
    let config = SweepConfig::new(1, 4, 1).expect("valid sweep");
    let mut bench =
        AllocationSweep::new(ValueShape::EmptyWithSideEffect, config).expect("valid geometry");
    bench
        .run(&mut gcstress::SystemHeap::new())
        .expect("zero-sized values never fail");

    // Batch sizes 1 and 2.
    assert!(gcstress::shape::side_effect_count() >= before + 3);
}
