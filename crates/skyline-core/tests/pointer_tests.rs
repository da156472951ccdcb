use glam::Vec2;
use skyline_core::normalize_pointer;

#[test]
fn corners_map_to_unit_square_with_y_up() {
    assert_eq!(normalize_pointer(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(normalize_pointer(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
    assert_eq!(normalize_pointer(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
}

#[test]
fn outside_the_area_is_clamped() {
    assert_eq!(normalize_pointer(-50.0, 900.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
}

#[test]
fn zero_sized_area_gives_centre() {
    assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    assert_eq!(normalize_pointer(10.0, 10.0, 800.0, f32::NAN), Vec2::ZERO);
}
