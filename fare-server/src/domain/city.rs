//! City and route direction types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown city alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown city alias: {alias}")]
pub struct InvalidCity {
    alias: String,
}

/// One of the two cities served by the high-speed line.
///
/// # Examples
///
/// ```
/// use fare_server::domain::City;
///
/// let mow: City = "mow".parse().unwrap();
/// assert_eq!(mow, City::Moscow);
/// assert_eq!(mow.code(), 2000000);
/// assert_eq!(mow.other(), City::SaintPetersburg);
///
/// assert!("kzn".parse::<City>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "mow")]
    Moscow,
    #[serde(rename = "spb")]
    SaintPetersburg,
}

impl City {
    /// Short alias used in query strings and stored documents.
    pub fn alias(&self) -> &'static str {
        match self {
            City::Moscow => "mow",
            City::SaintPetersburg => "spb",
        }
    }

    /// Upstream station code.
    pub fn code(&self) -> u32 {
        match self {
            City::Moscow => 2000000,
            City::SaintPetersburg => 2004000,
        }
    }

    /// Canonical upstream station name, as it appears on fare records.
    pub fn name(&self) -> &'static str {
        match self {
            City::Moscow => "МОСКВА",
            City::SaintPetersburg => "САНКТ-ПЕТЕРБУРГ",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
        }
    }

    /// The other end of the line.
    pub fn other(&self) -> City {
        match self {
            City::Moscow => City::SaintPetersburg,
            City::SaintPetersburg => City::Moscow,
        }
    }

    /// Look up a city by its canonical upstream station name.
    pub fn from_station_name(name: &str) -> Option<City> {
        [City::Moscow, City::SaintPetersburg]
            .into_iter()
            .find(|c| c.name() == name)
    }
}

impl FromStr for City {
    type Err = InvalidCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mow" => Ok(City::Moscow),
            "spb" => Ok(City::SaintPetersburg),
            other => Err(InvalidCity {
                alias: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An ordered (from, to) pair of the two cities.
///
/// A direction is always between two different cities, so it is built from
/// its destination alone. Equality is structural.
///
/// # Examples
///
/// ```
/// use fare_server::domain::{City, Direction};
///
/// let to_mow = Direction::towards(City::Moscow);
/// assert_eq!(to_mow.from(), City::SaintPetersburg);
/// assert_eq!(to_mow.reverse(), Direction::towards(City::SaintPetersburg));
/// assert_eq!(to_mow.reverse().reverse(), to_mow);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "City", from = "City")]
pub struct Direction {
    to: City,
}

impl Direction {
    /// Direction travelling towards `to`.
    pub fn towards(to: City) -> Self {
        Self { to }
    }

    /// Both directions, in a fixed order.
    pub fn all() -> [Direction; 2] {
        [
            Direction::towards(City::Moscow),
            Direction::towards(City::SaintPetersburg),
        ]
    }

    pub fn from(&self) -> City {
        self.to.other()
    }

    pub fn to(&self) -> City {
        self.to
    }

    /// The same pair travelled the other way.
    pub fn reverse(&self) -> Self {
        Self { to: self.from() }
    }

    /// Direction of a fare given its station names, if both match the line.
    pub fn from_station_names(origin: &str, destination: &str) -> Option<Self> {
        let from = City::from_station_name(origin)?;
        let to = City::from_station_name(destination)?;
        (from != to).then_some(Self { to })
    }

    /// "Санкт-Петербург → Москва"
    pub fn summary(&self) -> String {
        format!("{} → {}", self.from().display_name(), self.to.display_name())
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::towards(City::Moscow)
    }
}

impl From<City> for Direction {
    fn from(to: City) -> Self {
        Direction::towards(to)
    }
}

impl From<Direction> for City {
    fn from(direction: Direction) -> Self {
        direction.to
    }
}

impl FromStr for Direction {
    type Err = InvalidCity;

    /// Parses the destination alias (`"mow"` means "to Moscow").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<City>().map(Direction::towards)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.from().alias(), self.to.alias())
    }
}
