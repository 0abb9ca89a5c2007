//! Location resolver
//!
//! Resolves a committed suggestion or free text into a single coordinate,
//! and models the observable resolved-location cell.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{Geocoder, Query};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolves queries through a geocoding provider
#[derive(Debug)]
pub struct LocationResolver<G> {
    geocoder: G,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Resolve a query to a coordinate
    ///
    /// Blank address text fails without calling the provider.
    pub async fn resolve(&self, query: &Query) -> Result<Coordinates> {
        let location = match query {
            Query::ById(id) => self.geocoder.resolve_id(id).await?,
            Query::ByAddress(text) if text.trim().is_empty() => {
                return Err(Error::Resolution(
                    "INVALID_REQUEST: empty address".to_string(),
                ));
            }
            Query::ByAddress(text) => self.geocoder.resolve_address(text).await?,
        };

        debug!(%query, %location, "location resolved");
        Ok(location)
    }
}

/// State of the resolved-location cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resolution {
    /// Nothing committed yet, or every attempt so far failed
    #[default]
    Unset,
    /// At least one resolution is in flight
    Pending {
        /// Value to fall back to if the attempts fail
        previous: Option<Coordinates>,
        /// Number of attempts still outstanding
        outstanding: u32,
    },
    /// Settled on a coordinate
    Resolved(Coordinates),
}

impl Resolution {
    /// The cell after a new resolution has been started
    pub fn begin(self) -> Self {
        match self {
            Self::Unset => Self::Pending {
                previous: None,
                outstanding: 1,
            },
            Self::Resolved(location) => Self::Pending {
                previous: Some(location),
                outstanding: 1,
            },
            Self::Pending {
                previous,
                outstanding,
            } => Self::Pending {
                previous,
                outstanding: outstanding.saturating_add(1),
            },
        }
    }

    /// The cell after a resolution has settled
    ///
    /// Success always wins. Failure never discards a coordinate: a settled
    /// value is kept, and a pending cell falls back to what it held before.
    /// The cell stays pending until every outstanding attempt has settled.
    pub fn settle(self, result: &Result<Coordinates>) -> Self {
        match (self, result) {
            (Self::Pending { outstanding, .. }, Ok(location)) if outstanding > 1 => {
                Self::Pending {
                    previous: Some(*location),
                    outstanding: outstanding - 1,
                }
            }
            (_, Ok(location)) => Self::Resolved(*location),
            (
                Self::Pending {
                    previous,
                    outstanding,
                },
                Err(_),
            ) if outstanding > 1 => Self::Pending {
                previous,
                outstanding: outstanding - 1,
            },
            (Self::Pending { previous, .. }, Err(_)) => {
                previous.map_or(Self::Unset, Self::Resolved)
            }
            (settled, Err(_)) => settled,
        }
    }

    /// The last settled coordinate, if any
    pub fn location(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved(location) => Some(*location),
            Self::Pending { previous, .. } => *previous,
            Self::Unset => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Pending { .. } => write!(f, "pending"),
            Self::Resolved(location) => write!(f, "{}", location),
        }
    }
}
