// src/process/columns.rs

use crate::process::{coerce::Value, raw_table::Row, utils::header_key};

/// Logical columns the reports read, each with its accepted header spellings
/// in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Bidang,
    NoSt,
    NamaTim,
    Lokasi,
    TglBerangkat,
    TglKembali,
    Costsheet,
    Mak,
    Realisasi,
    Outstanding,
    /// Settlement (payment order) date.
    TglSpm,
    /// Activity date used when no settlement date is present.
    TripDate,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Bidang,
        Field::NoSt,
        Field::NamaTim,
        Field::Lokasi,
        Field::TglBerangkat,
        Field::TglKembali,
        Field::Costsheet,
        Field::Mak,
        Field::Realisasi,
        Field::Outstanding,
        Field::TglSpm,
        Field::TripDate,
    ];

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Bidang => &["BIDANG"],
            Field::NoSt => &["NO ST"],
            Field::NamaTim => &["NAMA TIM", "Nama", "NAMA"],
            Field::Lokasi => &["LOKASI PENUGASAN"],
            Field::TglBerangkat => &["TGL BERANGKAT"],
            Field::TglKembali => &["TGL KEMBALI"],
            Field::Costsheet => &["COSTSHEET"],
            Field::Mak => &["MAK"],
            Field::Realisasi => &["REALISASI"],
            Field::Outstanding => &["Outstanding", "SISA"],
            Field::TglSpm => &["TGL SPM"],
            Field::TripDate => &["TGL BERANGKAT", "Tanggal", "WAKTU"],
        }
    }

    /// Value of this field in `row`, if any header matches.
    pub fn resolve<'r>(&self, row: &'r Row) -> Option<&'r Value> {
        resolve(row, self.aliases())
    }
}

/// Find the value of the first header matching any alias, trying aliases in
/// the given order. Matching ignores case and surrounding whitespace; among
/// equal headers the first in header order wins.
pub fn resolve<'r, S: AsRef<str>>(row: &'r Row, aliases: &[S]) -> Option<&'r Value> {
    aliases.iter().find_map(|alias| {
        let wanted = header_key(alias.as_ref());
        row.cells()
            .iter()
            .find(|(header, _)| header_key(header) == wanted)
            .map(|(_, v)| v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_case_and_spacing_are_ignored() {
        for header in [" bidang ", "BIDANG", "Bidang", "bIdAnG\t"] {
            let row = Row::from_cells([(header, "IPP")]);
            assert_eq!(Field::Bidang.resolve(&row), Some(&Value::from("IPP")));
        }
    }

    #[test]
    fn alias_order_beats_header_order() {
        let row = Row::from_cells([("WAKTU", "01-02-2026"), ("Tanggal", "03-04-2026")]);
        assert_eq!(
            Field::TripDate.resolve(&row),
            Some(&Value::from("03-04-2026"))
        );
    }

    #[test]
    fn first_duplicate_header_wins() {
        let row = Row::from_cells([("MAK", "A009"), (" mak ", "A020")]);
        assert_eq!(Field::Mak.resolve(&row), Some(&Value::from("A009")));
    }

    #[test]
    fn missing_column_is_none() {
        let row = Row::from_cells([("BIDANG", "IPP")]);
        assert_eq!(Field::Realisasi.resolve(&row), None);
        assert_eq!(resolve::<&str>(&row, &[]), None);
    }

    #[test]
    fn secondary_alias_is_used() {
        let row = Row::from_cells([("SISA", Value::Number(10.0))]);
        assert_eq!(Field::Outstanding.resolve(&row), Some(&Value::Number(10.0)));
    }

    #[test]
    fn ad_hoc_alias_sets() {
        let row = Row::from_cells([("Nama Kegiatan", "Rapat")]);
        assert_eq!(
            resolve(&row, &["kegiatan", " nama kegiatan"]),
            Some(&Value::from("Rapat"))
        );
    }
}
