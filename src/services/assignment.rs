//! Selección de centro de servicio
//!
//! Heurística voraz de balanceo de carga. Función pura, sin I/O.

use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ServiceCenter;

/// Política de selección
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Menos reservas actuales
    #[default]
    LeastLoad,
    /// Mayor `capacity - reservas` entre centros activos
    MaxFreeCapacity,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "least_load" | "least-load" => Ok(SelectionPolicy::LeastLoad),
            "max_free_capacity" | "max-free-capacity" => Ok(SelectionPolicy::MaxFreeCapacity),
            other => Err(format!("unknown selection policy '{}'", other)),
        }
    }
}

/// Ningún candidato elegible
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no eligible service center")]
pub struct NoCandidate;

/// Elegir un centro entre los candidatos.
///
/// Solo son elegibles los centros activos con id. Los empates se resuelven
/// por orden de entrada: gana el primero.
pub fn select(
    candidates: &[ServiceCenter],
    policy: SelectionPolicy,
) -> Result<&ServiceCenter, NoCandidate> {
    let eligible = candidates.iter().filter(|c| c.has_id() && c.is_active);

    let chosen = match policy {
        // min_by_key devuelve el primer mínimo
        SelectionPolicy::LeastLoad => eligible.min_by_key(|c| c.current_bookings),
        SelectionPolicy::MaxFreeCapacity => eligible.min_by_key(|c| Reverse(c.free_capacity())),
    };

    chosen.ok_or(NoCandidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(id: &str, capacity: i32, load: usize, active: bool) -> ServiceCenter {
        ServiceCenter {
            id: id.to_string(),
            name: format!("Center {}", id),
            location: "Paris".to_string(),
            capacity,
            is_active: active,
            current_bookings: load,
        }
    }

    #[test]
    fn test_least_load_picks_global_minimum() {
        let centers = vec![
            center("C1", 10, 4, true),
            center("C2", 10, 1, true),
            center("C3", 10, 3, true),
        ];
        assert_eq!(select(&centers, SelectionPolicy::LeastLoad).unwrap().id, "C2");
    }

    #[test]
    fn test_least_load_tie_goes_to_first() {
        let centers = vec![
            center("C1", 10, 5, true),
            center("C2", 10, 2, true),
            center("C3", 10, 2, true),
        ];
        assert_eq!(select(&centers, SelectionPolicy::LeastLoad).unwrap().id, "C2");
    }

    #[test]
    fn test_least_load_skips_empty_ids() {
        let centers = vec![
            center("", 10, 0, true),
            center("   ", 10, 0, true),
            center("C9", 10, 8, true),
        ];
        assert_eq!(select(&centers, SelectionPolicy::LeastLoad).unwrap().id, "C9");
    }

    #[test]
    fn test_least_load_skips_inactive_centers() {
        let centers = vec![center("C1", 0, 0, false), center("C2", 0, 2, true)];
        assert_eq!(select(&centers, SelectionPolicy::LeastLoad).unwrap().id, "C2");
    }

    #[test]
    fn test_least_load_all_inactive() {
        let centers = vec![center("C1", 10, 0, false), center("C2", 10, 2, false)];
        assert_eq!(select(&centers, SelectionPolicy::LeastLoad), Err(NoCandidate));
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(select(&[], SelectionPolicy::LeastLoad), Err(NoCandidate));
        assert_eq!(select(&[], SelectionPolicy::MaxFreeCapacity), Err(NoCandidate));

        let only_blank = vec![center("", 5, 0, true), center("", 5, 1, true)];
        assert_eq!(select(&only_blank, SelectionPolicy::LeastLoad), Err(NoCandidate));
    }

    #[test]
    fn test_max_free_capacity() {
        let centers = vec![
            center("C1", 10, 9, true),
            center("C2", 20, 5, true),
            center("C3", 30, 1, false),
            center("C4", 16, 1, true),
        ];
        assert_eq!(select(&centers, SelectionPolicy::MaxFreeCapacity).unwrap().id, "C2");
    }

    #[test]
    fn test_max_free_capacity_tie_goes_to_first() {
        let centers = vec![center("A", 5, 0, true), center("B", 6, 1, true)];
        assert_eq!(select(&centers, SelectionPolicy::MaxFreeCapacity).unwrap().id, "A");
    }

    #[test]
    fn test_max_free_capacity_all_inactive() {
        let centers = vec![center("A", 5, 0, false), center("B", 6, 1, false)];
        assert_eq!(select(&centers, SelectionPolicy::MaxFreeCapacity), Err(NoCandidate));
    }

    #[test]
    fn test_max_free_capacity_handles_overbooked_centers() {
        let centers = vec![center("A", 2, 5, true), center("B", 1, 3, true)];
        assert_eq!(select(&centers, SelectionPolicy::MaxFreeCapacity).unwrap().id, "B");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("least_load".parse::<SelectionPolicy>(), Ok(SelectionPolicy::LeastLoad));
        assert_eq!(
            "MAX_FREE_CAPACITY".parse::<SelectionPolicy>(),
            Ok(SelectionPolicy::MaxFreeCapacity)
        );
        assert!("random".parse::<SelectionPolicy>().is_err());
    }
}
