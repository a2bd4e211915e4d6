use crate::error::ConfigError;
use crate::geometry::Geometry;

#[test]
fn capacity_matches_sets_ways_and_blocks() {
    for (c, b, s) in [(10, 6, 1), (15, 6, 3), (8, 6, 2), (6, 6, 0), (20, 5, 4), (12, 0, 12)] {
        let geometry = Geometry::new("L1", c, b, s).unwrap();
        let total = geometry.sets() as u64 * geometry.ways() as u64 * geometry.block_size();
        assert_eq!(total, 1 << c, "({c},{b},{s})");
        assert_eq!(geometry.capacity(), total);
    }
}

#[test]
fn rejects_capacity_below_one_set() {
    assert_eq!(
        Geometry::new("L2", 8, 6, 3),
        Err(ConfigError::InvalidGeometry { level: "L2", c: 8, b: 6, s: 3 })
    );
    assert_eq!(
        Geometry::new("L1", 64, 6, 1),
        Err(ConfigError::CapacityTooLarge { level: "L1", c: 64 })
    );
}

#[test]
fn fully_associative_index_is_zero() {
    let geometry = Geometry::new("Full", 8, 6, 2).unwrap();
    assert_eq!(geometry.index_bits(), 0);
    assert_eq!(geometry.decompose(0xffff_ffc0), (0xffff_ffc0 >> 6, 0));
    assert_eq!(geometry.decompose(0x3f), (0, 0));
}

#[test]
fn levels_decompose_independently() {
    let l1 = Geometry::new("L1", 10, 6, 1).unwrap();
    let l2 = Geometry::new("L2", 15, 6, 3).unwrap();
    let address = 0x7fff_5a84_87c8;
    assert_eq!(l1.decompose(address), (address >> 9, (address >> 6) & 0x7));
    assert_eq!(l2.decompose(address), (address >> 12, (address >> 6) & 0x3f));
}

#[test]
fn block_address_projects_between_levels() {
    let l1 = Geometry::new("L1", 10, 6, 1).unwrap();
    let l2 = Geometry::new("L2", 15, 6, 3).unwrap();
    for address in [0x0, 0x40, 0x12345, 0xdead_beef, 0x7fff_5a84_87c8] {
        let (tag, index) = l1.decompose(address);
        let block_address = l1.block_address(tag, index);
        assert_eq!(block_address, address >> 6);
        assert_eq!(l2.split_block_address(block_address), l2.decompose(address));
    }
}

#[test]
fn word_offset_within_block() {
    let geometry = Geometry::new("L2", 15, 6, 3).unwrap();
    assert_eq!(geometry.word_offset(0x1000), 0);
    assert_eq!(geometry.word_offset(0x1007), 0);
    assert_eq!(geometry.word_offset(0x1018), 3);
    assert_eq!(geometry.word_offset(0x103f), 7);
}
