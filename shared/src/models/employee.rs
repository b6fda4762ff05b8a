//! Employee Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Work area an employee belongs to
///
/// Stored and serialized by its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Sector {
    #[serde(rename = "Dermato")]
    #[cfg_attr(feature = "db", sqlx(rename = "Dermato"))]
    Dermato,
    #[serde(rename = "Farmacêutica")]
    #[cfg_attr(feature = "db", sqlx(rename = "Farmacêutica"))]
    Farmaceutica,
    #[serde(rename = "Xarope")]
    #[cfg_attr(feature = "db", sqlx(rename = "Xarope"))]
    Xarope,
    #[serde(rename = "Peso Médio")]
    #[cfg_attr(feature = "db", sqlx(rename = "Peso Médio"))]
    PesoMedio,
    #[serde(rename = "Conferência")]
    #[cfg_attr(feature = "db", sqlx(rename = "Conferência"))]
    Conferencia,
    #[serde(rename = "Encapsulação")]
    #[cfg_attr(feature = "db", sqlx(rename = "Encapsulação"))]
    Encapsulacao,
    #[serde(rename = "Pesagem")]
    #[cfg_attr(feature = "db", sqlx(rename = "Pesagem"))]
    Pesagem,
    #[serde(rename = "Sache")]
    #[cfg_attr(feature = "db", sqlx(rename = "Sache"))]
    Sache,
}

impl Sector {
    /// Every sector, in the order the registration form lists them
    pub const ALL: [Sector; 8] = [
        Sector::Dermato,
        Sector::Farmaceutica,
        Sector::Xarope,
        Sector::PesoMedio,
        Sector::Conferencia,
        Sector::Encapsulacao,
        Sector::Pesagem,
        Sector::Sache,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Sector::Dermato => "Dermato",
            Sector::Farmaceutica => "Farmacêutica",
            Sector::Xarope => "Xarope",
            Sector::PesoMedio => "Peso Médio",
            Sector::Conferencia => "Conferência",
            Sector::Encapsulacao => "Encapsulação",
            Sector::Pesagem => "Pesagem",
            Sector::Sache => "Sache",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a sector name is not one of [`Sector::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sector: {0}")]
pub struct UnknownSector(pub String);

impl FromStr for Sector {
    type Err = UnknownSector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSector(s.to_string()))
    }
}

/// Registered employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    /// Badge code scanned at the terminal (unique)
    pub badge_code: String,
    pub name: String,
    pub sector: Sector,
    /// 11-digit national id (CPF), unique
    pub national_id: String,
    /// Unix millis
    pub created_at: i64,
}

impl Employee {
    pub fn identity(&self) -> EmployeeIdentity {
        EmployeeIdentity {
            badge_code: self.badge_code.clone(),
            name: self.name.clone(),
        }
    }
}

/// Who is operating the terminal after a successful badge scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeIdentity {
    pub badge_code: String,
    pub name: String,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub national_id: String,
    pub sector: Sector,
    /// Defaults to `national_id` when absent
    #[serde(default)]
    pub badge_code: Option<String>,
}

/// Employee count for one sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SectorCount {
    pub sector: Sector,
    pub total: i64,
}
