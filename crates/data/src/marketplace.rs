//! Filtering and ordering of marketplace robot listings.

use std::cmp::Ordering;
use std::str::FromStr;
use traderobots_domain::entities::Robot;
use traderobots_domain::enums::RobotMethod;

/// Which robots to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotFilter {
    #[default]
    All,
    Method(RobotMethod),
}

impl RobotFilter {
    #[must_use]
    pub fn matches(&self, robot: &Robot) -> bool {
        match self {
            Self::All => true,
            Self::Method(method) => robot.method == *method,
        }
    }
}

impl FromStr for RobotFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<RobotMethod>()
            .map(Self::Method)
            .map_err(|e| e.to_string())
    }
}

/// How robots are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotSort {
    /// Highest win rate first.
    #[default]
    WinRate,
    /// Most recently created first; undated robots last.
    Newest,
}

impl RobotSort {
    fn compare(&self, a: &Robot, b: &Robot) -> Ordering {
        match self {
            Self::WinRate => b.win_rate.total_cmp(&a.win_rate),
            Self::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

impl FromStr for RobotSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win_rate" | "winrate" => Ok(Self::WinRate),
            "newest" => Ok(Self::Newest),
            other => Err(format!("Unknown sort order: {other}")),
        }
    }
}

/// Applies a filter and sort order to a robot listing.
#[must_use]
pub fn marketplace_view(robots: Vec<Robot>, filter: RobotFilter, sort: RobotSort) -> Vec<Robot> {
    let mut view: Vec<Robot> = robots.into_iter().filter(|r| filter.matches(r)).collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}
