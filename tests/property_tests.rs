//! Property tests for recompute totality and determinism

use dimgfx::{
    recompute, DimensionDefinition, DimensionKind, DimStyle, Vector3,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        -100.0..100.0f64,
    ]
}

fn point() -> impl Strategy<Value = Vector3> {
    (coord(), coord()).prop_map(|(x, y)| Vector3::new(x, y, 0.0))
}

fn any_kind() -> impl Strategy<Value = DimensionKind> {
    prop_oneof![
        (point(), point(), point()).prop_map(|(first, second, line_point)| {
            DimensionKind::Aligned {
                first,
                second,
                line_point,
                oblique: 0.0,
            }
        }),
        (point(), point(), point(), -3.0..3.0f64).prop_map(
            |(first, second, line_point, rotation)| DimensionKind::Rotated {
                first,
                second,
                line_point,
                rotation,
                oblique: 0.0,
            }
        ),
        (point(), point(), point(), point()).prop_map(|(vertex, first, second, arc_point)| {
            DimensionKind::ThreePointAngular {
                vertex,
                first,
                second,
                arc_point,
            }
        }),
        (point(), point(), point(), point()).prop_map(|(a, b, c, d)| {
            DimensionKind::TwoLineAngular {
                line1: (a, b),
                line2: (c, d),
                arc_point: d,
            }
        }),
        (point(), point()).prop_map(|(center, chord_point)| DimensionKind::Radial {
            center,
            chord_point,
            leader_length: 0.0,
        }),
        (point(), point()).prop_map(|(chord_point, far_chord_point)| {
            DimensionKind::Diametric {
                chord_point,
                far_chord_point,
                leader_length: 0.0,
            }
        }),
        (point(), point(), point()).prop_map(|(origin, feature, leader_end)| {
            DimensionKind::Ordinate {
                origin,
                feature,
                leader_end,
                use_x_datum: true,
            }
        }),
    ]
}

proptest! {
    /// Any well-formed definition recomputes without failing and yields a
    /// renderable set with exactly one text block.
    #[test]
    fn recompute_is_total(kind in any_kind()) {
        let mut def = DimensionDefinition::new(kind);
        let mut style = DimStyle::standard();
        let out = recompute(&mut def, &mut style).unwrap();
        prop_assert_eq!(out.texts().count(), 1);
        prop_assert!(def.measurement().is_some());
    }

    /// Rebuilding with unchanged inputs reproduces the identical primitive
    /// sequence.
    #[test]
    fn recompute_is_deterministic(kind in any_kind()) {
        let mut def = DimensionDefinition::new(kind);
        let mut style_a = DimStyle::standard();
        let a = recompute(&mut def, &mut style_a).unwrap();
        let mut style_b = DimStyle::standard();
        let b = recompute(&mut def, &mut style_b).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Measurements never come out negative or non-finite.
    #[test]
    fn measurements_are_sane(kind in any_kind()) {
        let mut def = DimensionDefinition::new(kind);
        let style = DimStyle::standard();
        let m = dimgfx::update_measurement(&mut def, &style).unwrap();
        prop_assert!(m.value().is_finite());
        prop_assert!(m.value() >= 0.0);
    }

    /// Angular spans drawn by the engine stay at or below a half turn.
    #[test]
    fn angular_spans_bounded(
        vertex in point(),
        first in point(),
        second in point(),
        arc_point in point(),
    ) {
        let mut def = DimensionDefinition::new(DimensionKind::ThreePointAngular {
            vertex,
            first,
            second,
            arc_point,
        });
        let mut style = DimStyle::standard();
        let out = recompute(&mut def, &mut style).unwrap();
        for arc in out.arcs() {
            let mut sweep = arc.end_angle - arc.start_angle;
            if sweep < 0.0 {
                sweep += std::f64::consts::TAU;
            }
            prop_assert!(sweep <= std::f64::consts::PI + 1e-6);
        }
    }
}
