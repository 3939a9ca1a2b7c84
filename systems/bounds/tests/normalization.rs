use delve_core::Settings;
use delve_system_bounds::BoundsNormalizer;
use delve_system_room_graph::RoomGraphBuilder;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn grown_layouts_fit_the_grid_after_normalization(
        seed in any::<u64>(),
        room_count in 0u32..48,
        hall_width in 1u32..=3,
    ) {
        let settings = Settings::new(3, 9, room_count, hall_width, 0).expect("valid settings");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (mut rooms, _) = RoomGraphBuilder::new().grow(&settings, &mut rng).into_parts();

        let bounds = BoundsNormalizer::new()
            .normalize(&mut rooms)
            .expect("growth always yields the root");

        prop_assert_eq!(rooms.iter().map(|room| room.left()).min(), Some(0));
        prop_assert_eq!(rooms.iter().map(|room| room.top()).min(), Some(0));
        for room in &rooms {
            prop_assert!(room.right() < bounds.columns() as i32);
            prop_assert!(room.bottom() < bounds.rows() as i32);
        }
    }
}
