//! Sorteringsordning per widget

use anyhow::Result;
use tracing::{debug, warn};

use super::{PreferenceFile, Preferences};
use crate::models::sort_order::{default_sort_order, enabled_criteria, normalize, toggle_sort_state};
use crate::models::{SortCriterion, SortOrderState};

const NAMESPACE: &str = "SortOrderPersistence";

fn count_key(widget_id: i32) -> String {
    format!("{}ItemCount", widget_id)
}

fn name_key(widget_id: i32, index: usize) -> String {
    format!("{}Name{}", widget_id, index)
}

fn state_key(widget_id: i32, index: usize) -> String {
    format!("{}State{}", widget_id, index)
}

pub struct SortOrderStore {
    prefs: Preferences,
}

impl SortOrderStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Hämta sorteringsordningen. Tom om widgeten inte initierats.
    pub fn get_sort_order(&self, widget_id: i32) -> Result<Vec<SortOrderState>> {
        self.prefs.read(NAMESPACE, |file| read_states(file, widget_id))
    }

    /// Skriv över hela sorteringsordningen
    pub fn set_sort_order(&self, widget_id: i32, states: &[SortOrderState]) -> Result<()> {
        self.prefs
            .edit(NAMESPACE, |file| write_states(file, widget_id, states))
    }

    /// Hämta sorteringsordningen och spara standardordningen första gången
    pub fn ensure_sort_order(&self, widget_id: i32) -> Result<Vec<SortOrderState>> {
        self.prefs.edit(NAMESPACE, |file| {
            let states = read_states(file, widget_id);
            if !states.is_empty() {
                return states;
            }

            debug!("Initierar sorteringsordning för widget {}", widget_id);
            let defaults = default_sort_order();
            write_states(file, widget_id, &defaults);
            defaults
        })
    }

    /// Hantera ett klick på sorteringsikon `icon_index`: växla kriteriet,
    /// flytta det till gränsen mellan på- och avslagna och spara.
    /// Ett index utanför sekvensen ändrar ingenting.
    pub fn process_click(&self, widget_id: i32, icon_index: usize) -> Result<Vec<SortOrderState>> {
        self.prefs.edit(NAMESPACE, |file| {
            let mut states = read_states(file, widget_id);
            if toggle_sort_state(&mut states, icon_index) {
                write_states(file, widget_id, &states);
            }
            states
        })
    }

    /// Påslagna kriterier i prioritetsordning
    pub fn task_sort_order(&self, widget_id: i32) -> Result<Vec<SortCriterion>> {
        Ok(enabled_criteria(&self.get_sort_order(widget_id)?))
    }

    /// Ta bort all sorteringsdata för en widget
    pub fn remove(&self, widget_id: i32) -> Result<()> {
        self.prefs.edit(NAMESPACE, |file| {
            let count = file.get_int(&count_key(widget_id), 0).max(0) as usize;
            clear_entries(file, widget_id, 0, count);
            file.remove(&count_key(widget_id));
        })
    }
}

fn read_states(file: &PreferenceFile, widget_id: i32) -> Vec<SortOrderState> {
    let count = file.get_int(&count_key(widget_id), 0).max(0) as usize;

    let mut states: Vec<SortOrderState> = (0..count)
        .filter_map(|index| {
            let name = file.get_string(&name_key(widget_id, index), "");
            let enabled = file.get_bool(&state_key(widget_id, index), false);
            match SortCriterion::from_name(&name) {
                Some(criterion) => Some(SortOrderState::new(criterion, enabled)),
                None => {
                    warn!("Okänt sorteringskriterium '{}' för widget {}", name, widget_id);
                    None
                }
            }
        })
        .collect();

    normalize(&mut states);
    states
}

fn write_states(file: &mut PreferenceFile, widget_id: i32, states: &[SortOrderState]) {
    let old_count = file.get_int(&count_key(widget_id), 0).max(0) as usize;

    file.put_int(count_key(widget_id), states.len() as i64);
    for (index, state) in states.iter().enumerate() {
        file.put_string(name_key(widget_id, index), state.criterion.name());
        file.put_bool(state_key(widget_id, index), state.enabled);
    }

    clear_entries(file, widget_id, states.len(), old_count);
}

fn clear_entries(file: &mut PreferenceFile, widget_id: i32, from: usize, to: usize) {
    for index in from..to {
        file.remove(&name_key(widget_id, index));
        file.remove(&state_key(widget_id, index));
    }
}
