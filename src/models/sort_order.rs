use serde::{Deserialize, Serialize};

use super::task::SortCriterion;

/// Ett sorteringskriterium och om det är påslaget.
/// Ordningen i en `Vec<SortOrderState>` är sorteringsprioriteten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderState {
    pub criterion: SortCriterion,
    pub enabled: bool,
}

impl SortOrderState {
    pub fn new(criterion: SortCriterion, enabled: bool) -> Self {
        Self { criterion, enabled }
    }
}

/// Startordning för en ny widget
pub fn default_sort_order() -> Vec<SortOrderState> {
    vec![
        SortOrderState::new(SortCriterion::Priority, true),
        SortOrderState::new(SortCriterion::DueDate, true),
        SortOrderState::new(SortCriterion::Done, false),
    ]
}

/// Växla kriteriet på position `index` och flytta det till gränsen
/// mellan påslagna och avslagna kriterier.
///
/// Posten tas bort och sätts in före den första avslagna posten bland
/// de återstående; finns ingen avslagen post läggs den sist. Övriga
/// poster behåller sin inbördes ordning. Ett index utanför sekvensen
/// ändrar ingenting och ger `false`.
pub fn toggle_sort_state(states: &mut Vec<SortOrderState>, index: usize) -> bool {
    if index >= states.len() {
        return false;
    }

    let mut item = states.remove(index);
    item.enabled = !item.enabled;

    match states.iter().position(|s| !s.enabled) {
        Some(pos) => states.insert(pos, item),
        None => states.push(item),
    }

    true
}

/// Påslagna kriterier i prioritetsordning
pub fn enabled_criteria(states: &[SortOrderState]) -> Vec<SortCriterion> {
    states
        .iter()
        .filter(|s| s.enabled)
        .map(|s| s.criterion)
        .collect()
}

/// Säkerställ exakt en post per kriterium: dubbletter tas bort (första
/// förekomsten vinner) och saknade kriterier läggs till avslagna.
/// En tom sekvens lämnas orörd.
pub fn normalize(states: &mut Vec<SortOrderState>) {
    if states.is_empty() {
        return;
    }

    let mut seen = Vec::with_capacity(SortCriterion::all().len());
    states.retain(|s| {
        if seen.contains(&s.criterion) {
            false
        } else {
            seen.push(s.criterion);
            true
        }
    });

    for criterion in SortCriterion::all() {
        if !seen.contains(criterion) {
            states.push(SortOrderState::new(*criterion, false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SortCriterion::*;

    fn states(items: &[(SortCriterion, bool)]) -> Vec<SortOrderState> {
        items
            .iter()
            .map(|(c, e)| SortOrderState::new(*c, *e))
            .collect()
    }

    #[test]
    fn test_toggle_enabled_moves_behind_enabled_run() {
        let mut s = states(&[(Priority, true), (DueDate, true), (Done, false)]);

        assert!(toggle_sort_state(&mut s, 0));

        assert_eq!(s, states(&[(DueDate, true), (Priority, false), (Done, false)]));
    }

    #[test]
    fn test_toggle_disabled_joins_end_of_enabled_run() {
        let mut s = states(&[(Priority, true), (DueDate, false), (Done, false)]);

        toggle_sort_state(&mut s, 2);

        assert_eq!(s, states(&[(Priority, true), (Done, true), (DueDate, false)]));
    }

    #[test]
    fn test_toggle_when_all_enabled_appends() {
        let mut s = states(&[(Priority, true), (DueDate, false), (Done, true)]);

        toggle_sort_state(&mut s, 1);

        assert_eq!(s, states(&[(Priority, true), (Done, true), (DueDate, true)]));
    }

    #[test]
    fn test_toggle_when_all_disabled_moves_first() {
        let mut s = states(&[(Priority, false), (DueDate, false), (Done, false)]);

        toggle_sort_state(&mut s, 1);

        assert_eq!(s, states(&[(DueDate, true), (Priority, false), (Done, false)]));
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut s = default_sort_order();
        let before = s.clone();

        assert!(!toggle_sort_state(&mut s, 3));
        assert_eq!(s, before);

        let mut empty = Vec::new();
        assert!(!toggle_sort_state(&mut empty, 0));
    }

    #[test]
    fn test_enabled_criteria() {
        let s = states(&[(DueDate, true), (Done, true), (Priority, false)]);
        assert_eq!(enabled_criteria(&s), vec![DueDate, Done]);
    }

    #[test]
    fn test_normalize() {
        let mut s = states(&[(Done, true), (Done, false), (Priority, true)]);
        normalize(&mut s);
        assert_eq!(s, states(&[(Done, true), (Priority, true), (DueDate, false)]));

        let mut empty = Vec::new();
        normalize(&mut empty);
        assert!(empty.is_empty());
    }
}
