// src/report/personnel.rs

use serde::Serialize;
use std::collections::HashMap;

use super::amount::{category, field_amount};
use crate::process::{Field, RawTable};

/// Optional narrowing of the workload view.
#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
    /// Only rows of this division (compared upper-cased).
    pub bidang: Option<String>,
    /// Case-insensitive substring of the person's name.
    pub search: Option<String>,
}

/// Workload of one team member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub name: String,
    /// Division of the first task seen for this person.
    pub bidang: String,
    /// Indices into `RawTable::rows`.
    pub tasks: Vec<usize>,
    /// Realisation summed over `tasks`.
    pub accumulated: f64,
}

impl Person {
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Names listed in a team cell: comma separated, blanks dropped.
pub fn team_members(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Workload per person, highest accumulated realisation first.
pub fn personnel(table: &RawTable, filter: &PersonFilter) -> Vec<Person> {
    let wanted_bidang = filter.bidang.as_deref().map(|b| b.trim().to_uppercase());
    let search = filter
        .search
        .as_deref()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty());

    let mut people: Vec<Person> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let bidang = category(row, Field::Bidang);
        if matches!(&wanted_bidang, Some(w) if *w != bidang) {
            continue;
        }
        let team = Field::NamaTim
            .resolve(row)
            .map(|v| v.to_text().into_owned())
            .unwrap_or_default();
        let realisasi = field_amount(row, Field::Realisasi);

        for name in team_members(&team) {
            if let Some(needle) = &search {
                if !name.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }
            let i = *index.entry(name.clone()).or_insert_with(|| {
                people.push(Person {
                    name,
                    bidang: bidang.clone(),
                    tasks: Vec::new(),
                    accumulated: 0.0,
                });
                people.len() - 1
            });
            people[i].tasks.push(row_idx);
            people[i].accumulated += realisasi;
        }
    }

    people.sort_by(|a, b| b.accumulated.total_cmp(&a.accumulated));
    people
}

/// Up to two upper-cased initials; `??` for a blank name.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect();
    if letters.is_empty() {
        "??".to_string()
    } else {
        letters.to_uppercase()
    }
}
