use serde::Serialize;

use super::round::HoleScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BogeyType {
    Single,
    Double,
    TripleOrWorse,
}

impl BogeyType {
    const fn new(over_par: i32) -> Self {
        match over_par {
            1 => Self::Single,
            2 => Self::Double,
            _ => Self::TripleOrWorse,
        }
    }
}

/// Six buckets of `strokes - par`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ScoreBucket {
    EagleOrBetter,
    Birdie,
    Par,
    Bogey(BogeyType),
}

impl ScoreBucket {
    pub const ALL: [ScoreBucket; 6] = [
        ScoreBucket::EagleOrBetter,
        ScoreBucket::Birdie,
        ScoreBucket::Par,
        ScoreBucket::Bogey(BogeyType::Single),
        ScoreBucket::Bogey(BogeyType::Double),
        ScoreBucket::Bogey(BogeyType::TripleOrWorse),
    ];

    pub const fn new(diff: i32) -> Self {
        match diff {
            ..=-2 => Self::EagleOrBetter,
            -1 => Self::Birdie,
            0 => Self::Par,
            1.. => Self::Bogey(BogeyType::new(diff)),
        }
    }

    pub fn of(score: &HoleScore) -> Self {
        Self::new(score.diff())
    }

    /// Position in [`ScoreBucket::ALL`].
    pub const fn slot(&self) -> usize {
        match self {
            Self::EagleOrBetter => 0,
            Self::Birdie => 1,
            Self::Par => 2,
            Self::Bogey(BogeyType::Single) => 3,
            Self::Bogey(BogeyType::Double) => 4,
            Self::Bogey(BogeyType::TripleOrWorse) => 5,
        }
    }

    pub const fn label(&self) -> &'static str {
        use ScoreBucket::*;
        match self {
            EagleOrBetter => "eagle_or_better",
            Birdie => "birdie",
            Par => "par",
            Bogey(bogey_type) => match bogey_type {
                BogeyType::Single => "bogey",
                BogeyType::Double => "double_bogey",
                BogeyType::TripleOrWorse => "triple_or_worse",
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn buckets_follow_diff() {
        assert_eq!(ScoreBucket::new(-4), ScoreBucket::EagleOrBetter);
        assert_eq!(ScoreBucket::new(-2), ScoreBucket::EagleOrBetter);
        assert_eq!(ScoreBucket::new(-1), ScoreBucket::Birdie);
        assert_eq!(ScoreBucket::new(0), ScoreBucket::Par);
        assert_eq!(ScoreBucket::new(1), ScoreBucket::Bogey(BogeyType::Single));
        assert_eq!(ScoreBucket::new(2), ScoreBucket::Bogey(BogeyType::Double));
        assert_eq!(
            ScoreBucket::new(7),
            ScoreBucket::Bogey(BogeyType::TripleOrWorse)
        );
    }

    #[test]
    fn slots_match_all() {
        for (slot, bucket) in ScoreBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.slot(), slot);
        }
        assert_eq!(ScoreBucket::of(&HoleScore::new(1, 3)).label(), "eagle_or_better");
    }

    #[test]
    fn three_digit_strokes_are_triple_or_worse() {
        for strokes in [128, 130, 200, u8::MAX] {
            let score = HoleScore::new(strokes, 3);
            assert_eq!(score.diff(), strokes as i32 - 3);
            assert_eq!(
                ScoreBucket::of(&score),
                ScoreBucket::Bogey(BogeyType::TripleOrWorse)
            );
        }
        assert_eq!(ScoreBucket::of(&HoleScore::new(1, u8::MAX)), ScoreBucket::EagleOrBetter);
    }
}
