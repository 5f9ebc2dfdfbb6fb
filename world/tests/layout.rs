use glam::Vec2;
use shop_patrol_core::CellCoord;
use shop_patrol_world::{GridIndex, ShopLayout};

#[test]
fn layout_parses_from_authored_toml() {
    let layout: ShopLayout = toml::from_str(
        r#"
        [[blocked]]
        origin = { column = 1, row = 1 }
        size = { width = 2, height = 1 }

        [[blocked]]
        origin = { column = 0, row = 3 }
        size = { width = 1, height = 1 }
        "#,
    )
    .expect("layout parses");

    assert_eq!(layout.blocked().len(), 2);

    let mut grid = GridIndex::create(4, 4, 1.0, Vec2::ZERO).expect("valid grid");
    layout.apply_to(&mut grid).expect("layout fits");

    for cell in [
        CellCoord::new(1, 1),
        CellCoord::new(2, 1),
        CellCoord::new(0, 3),
    ] {
        assert_eq!(grid.is_walkable(cell), Ok(false), "{cell:?} should be blocked");
    }
    assert_eq!(grid.is_walkable(CellCoord::new(3, 1)), Ok(true));
}

#[test]
fn empty_layout_leaves_grid_walkable() {
    let layout: ShopLayout = toml::from_str("").expect("empty layout parses");
    let mut grid = GridIndex::create(3, 3, 1.0, Vec2::ZERO).expect("valid grid");
    layout.apply_to(&mut grid).expect("nothing to apply");
    assert!(grid.nodes().iter().all(|node| node.is_walkable()));
}
