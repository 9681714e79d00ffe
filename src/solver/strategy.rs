use std::{fmt, str::FromStr};

use itertools::iproduct;
use serde::Serialize;

use crate::board::Error;

/// Which row to fill next.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableOrdering {
    /// Lowest row without a queen.
    Natural,
    /// Row with the fewest safe columns, lowest index on ties.
    Mrv,
}

/// In which order to try the columns of the chosen row.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrdering {
    /// Ascending column index.
    Natural,
    /// Ascending count of safe cells left on the board after the placement.
    Lcv,
}

/// What to rule out before trying the columns of the chosen row.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filtering {
    None,
    /// Abandon the branch when some empty row has no safe column left.
    ForwardChecking,
    /// Skip columns whose placement would leave some other empty row with no safe column.
    ArcConsistency,
}

impl Default for VariableOrdering {
    fn default() -> Self {
        Self::Natural
    }
}

impl Default for ValueOrdering {
    fn default() -> Self {
        Self::Natural
    }
}

impl Default for Filtering {
    fn default() -> Self {
        Self::None
    }
}

static FILTERINGS: [Filtering; 3] = [
    Filtering::None,
    Filtering::ForwardChecking,
    Filtering::ArcConsistency,
];
static VARIABLES: [VariableOrdering; 2] = [VariableOrdering::Natural, VariableOrdering::Mrv];
static VALUES: [ValueOrdering; 2] = [ValueOrdering::Natural, ValueOrdering::Lcv];

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct Strategy {
    pub variable: VariableOrdering,
    pub value: ValueOrdering,
    pub filtering: Filtering,
}

impl Strategy {
    pub fn new(variable: VariableOrdering, value: ValueOrdering, filtering: Filtering) -> Self {
        Self {
            variable,
            value,
            filtering,
        }
    }

    /// All twelve combinations, baseline first.
    pub fn all() -> impl Iterator<Item = Strategy> {
        iproduct!(FILTERINGS.iter(), VARIABLES.iter(), VALUES.iter())
            .map(|(&filtering, &variable, &value)| Strategy::new(variable, value, filtering))
    }

    /// Whether the engine keeps a threat matrix for this combination. Filtering needs one, and so
    /// does MRV on its own. Everything else reads safety straight off the board.
    pub fn tracks_threats(&self) -> bool {
        self.filtering != Filtering::None
            || (self.variable == VariableOrdering::Mrv && self.value == ValueOrdering::Natural)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        if self.variable == VariableOrdering::Mrv {
            parts.push("MRV");
        }
        if self.value == ValueOrdering::Lcv {
            parts.push("LCV");
        }
        match self.filtering {
            Filtering::None => (),
            Filtering::ForwardChecking => parts.push("Forward Checking"),
            Filtering::ArcConsistency => parts.push("Arc Consistency"),
        }
        if parts.is_empty() {
            write!(f, "Backtracking")
        } else {
            write!(f, "{}", parts.join(" + "))
        }
    }
}

impl FromStr for VariableOrdering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "natural" => Ok(Self::Natural),
            "mrv" => Ok(Self::Mrv),
            _ => Err(Error::UnknownStrategy(s.to_owned())),
        }
    }
}

impl FromStr for ValueOrdering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "natural" => Ok(Self::Natural),
            "lcv" => Ok(Self::Lcv),
            _ => Err(Error::UnknownStrategy(s.to_owned())),
        }
    }
}

impl FromStr for Filtering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "fc" | "forward-checking" => Ok(Self::ForwardChecking),
            "ac" | "arc-consistency" => Ok(Self::ArcConsistency),
            _ => Err(Error::UnknownStrategy(s.to_owned())),
        }
    }
}
