/// Placement → points curve used for every round of the league.
///
/// The podium table covers the first placements, then points drop by `step`
/// per placement while they stay above `linear_floor`. From the first
/// placement that would land on or below the floor, points drop by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsCurve {
    pub podium: [u32; 4],
    pub step: u32,
    pub linear_floor: u32,
}

pub const LEAGUE_CURVE: PointsCurve = PointsCurve {
    podium: [50, 45, 40, 38],
    step: 2,
    linear_floor: 10,
};

impl Default for PointsCurve {
    fn default() -> Self {
        LEAGUE_CURVE
    }
}

impl PointsCurve {
    pub fn points(&self, placement: u32) -> u32 {
        let podium_places = self.podium.len() as u32;
        match placement {
            0 => 0,
            place if place <= podium_places => self.podium[(place - 1) as usize],
            place => {
                let transition = self.transition_placement();
                if place < transition {
                    self.stepped(place)
                } else {
                    self.linear_floor.saturating_sub(place - transition)
                }
            }
        }
    }

    /// First placement past the podium whose stepped value is at or below the floor.
    pub fn transition_placement(&self) -> u32 {
        let podium_places = self.podium.len() as u32;
        let last = self.podium[self.podium.len() - 1];
        if self.step == 0 {
            return u32::MAX;
        }
        if last <= self.linear_floor {
            return podium_places + 1;
        }
        let steps = (last - self.linear_floor).div_ceil(self.step);
        podium_places + steps
    }

    fn stepped(&self, placement: u32) -> u32 {
        let podium_places = self.podium.len() as u32;
        let last = self.podium[self.podium.len() - 1];
        last.saturating_sub((placement - podium_places) * self.step)
    }
}

/// Points for a placement on the league curve.
pub fn points(placement: u32) -> u32 {
    LEAGUE_CURVE.points(placement)
}
