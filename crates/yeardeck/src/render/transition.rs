use crate::show::Direction;

/// How far, as a fraction of the slide width, a slide travels while
/// entering or leaving.
pub const SLIDE_TRAVEL: f32 = 0.25;

/// Visual state of the current slide, derived only from whether a
/// transition is in flight and which way the last move went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidePose {
    /// Leaving the screen during a transition.
    Animating(Direction),
    /// At rest, having entered from the right (the default).
    FromRight,
    /// At rest, having entered from the left after a backward move.
    FromLeft,
}

/// Where to draw a slide for a pose at a given point of its animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal offset as a fraction of the slide width.
    pub offset: f32,
    pub opacity: f32,
}

impl SlidePose {
    pub fn from_state(is_transitioning: bool, direction: Direction) -> Self {
        match (is_transitioning, direction) {
            (true, d) => Self::Animating(d),
            (false, Direction::Backward) => Self::FromLeft,
            (false, Direction::Forward) => Self::FromRight,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Animating(Direction::Forward) => "animating forward",
            Self::Animating(Direction::Backward) => "animating backward",
            Self::FromRight => "from-right",
            Self::FromLeft => "from-left",
        }
    }

    /// `t` is the raw 0..=1 progress of the transition (when animating)
    /// or of the entrance (when at rest).
    pub fn placement(&self, t: f32) -> Placement {
        let e = ease_in_out(t.clamp(0.0, 1.0));
        match self {
            Self::Animating(Direction::Forward) => Placement {
                offset: -SLIDE_TRAVEL * e,
                opacity: 1.0 - e,
            },
            Self::Animating(Direction::Backward) => Placement {
                offset: SLIDE_TRAVEL * e,
                opacity: 1.0 - e,
            },
            Self::FromRight => Placement {
                offset: SLIDE_TRAVEL * (1.0 - e),
                opacity: e,
            },
            Self::FromLeft => Placement {
                offset: -SLIDE_TRAVEL * (1.0 - e),
                opacity: e,
            },
        }
    }
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_follows_transition_flag_and_direction() {
        assert_eq!(
            SlidePose::from_state(true, Direction::Forward),
            SlidePose::Animating(Direction::Forward)
        );
        assert_eq!(
            SlidePose::from_state(true, Direction::Backward),
            SlidePose::Animating(Direction::Backward)
        );
        assert_eq!(
            SlidePose::from_state(false, Direction::Forward),
            SlidePose::FromRight
        );
        assert_eq!(
            SlidePose::from_state(false, Direction::Backward),
            SlidePose::FromLeft
        );
    }

    #[test]
    fn test_class_names() {
        assert_eq!(
            SlidePose::Animating(Direction::Forward).class_name(),
            "animating forward"
        );
        assert_eq!(SlidePose::FromRight.class_name(), "from-right");
        assert_eq!(SlidePose::FromLeft.class_name(), "from-left");
    }

    #[test]
    fn test_forward_exit_moves_left_and_fades() {
        let pose = SlidePose::Animating(Direction::Forward);
        assert_eq!(pose.placement(0.0), Placement { offset: 0.0, opacity: 1.0 });
        let end = pose.placement(1.0);
        assert_eq!(end.offset, -SLIDE_TRAVEL);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn test_entrance_settles_at_rest() {
        for pose in [SlidePose::FromRight, SlidePose::FromLeft] {
            let end = pose.placement(1.0);
            assert_eq!(end.offset, 0.0);
            assert_eq!(end.opacity, 1.0);
        }
        assert!(SlidePose::FromRight.placement(0.0).offset > 0.0);
        assert!(SlidePose::FromLeft.placement(0.0).offset < 0.0);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
    }
}
