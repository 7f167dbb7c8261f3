//! Example that demonstrates the usage shown in the package documentation.
//!
//! This shows how to convert CPU sets between range, list and mask notation and how to combine
//! them.

use cpuset::CpuSet;

fn main() {
    println!("=== CpuSet README Example ===");

    let mut selected = CpuSet::new("0-3,7", false).unwrap();

    println!("Range: {}", selected.range());
    println!("List: {}", selected.list());
    println!("Mask: {}", selected.mask());

    let high = CpuSet::new("80,00000000", true).unwrap();
    println!("Adding {high} (from mask {})", high.mask());
    selected.add(&high);
    assert_eq!(selected.range(), "0-3,7,39");

    let removed = CpuSet::new("2-3", false).unwrap();
    println!("Removing {removed}");
    selected.remove(&removed);
    assert_eq!(selected.range(), "0-1,7,39");

    println!("Result as range: {}", selected.range());
    println!("Result as mask: {}", selected.mask());

    println!("README example completed successfully!");
}
