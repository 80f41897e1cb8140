use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::loader::load_raw;
use super::model::{Category, PrizeEntry, RawRecord, RoleSimple};
use crate::error::Result;

/// What a cleaning run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_written: usize,
    pub roles: BTreeMap<RoleSimple, usize>,
    /// Blank gender / ethnicity / degree cells replaced by the missing marker.
    pub missing_substitutions: usize,
}

/// Run the full cleaning step: load `input`, normalize every row, and
/// replace `output` with the result.
///
/// Nothing is written unless every row loads and cleans; the table is staged
/// in a temporary file next to `output` and renamed into place.
pub fn clean_file(input: &Path, output: &Path) -> Result<CleanReport> {
    let raw = load_raw(input)?;
    let entries = clean_records(&raw);
    write_table(output, &entries)?;

    let report = report_for(&entries);
    log::info!(
        "Wrote {} cleaned rows to {} ({} missing-marker substitutions)",
        report.rows_written,
        output.display(),
        report.missing_substitutions
    );
    Ok(report)
}

/// Normalize every raw record, preserving input order.
pub fn clean_records(raw: &[RawRecord]) -> Vec<PrizeEntry> {
    raw.iter().map(clean_record).collect()
}

/// Normalize one raw record into a table row.
pub fn clean_record(raw: &RawRecord) -> PrizeEntry {
    PrizeEntry {
        prize_id: raw.prize_id.clone(),
        prize_name: raw.prize_name.clone(),
        prize_alias: raw.prize_alias.clone(),
        prize_institution: raw.prize_institution.clone(),
        prize_year: raw.prize_year,
        prize_genre: title_case(&raw.prize_genre),
        person_id: raw.person_id.clone(),
        first_name: raw.first_name.clone(),
        last_name: raw.last_name.clone(),
        gender: Category::from_raw(&raw.gender),
        uk_residence: raw.uk_residence,
        ethnicity_macro: Category::from_raw(&raw.ethnicity_macro),
        highest_degree: Category::from_raw(&raw.highest_degree),
        degree_field_cat: raw.degree_field_cat.clone(),
        degree_institution: raw.degree_institution.clone(),
        degree_field: raw.degree_field.clone(),
        role_simple: RoleSimple::from_description(&raw.person_role),
        person_role: raw.person_role.clone(),
        book_id: raw.book_id.clone(),
        book_title: raw.book_title.clone(),
    }
}

/// Title-case genre text: words split on whitespace or `-` start upper case,
/// the rest is lower case (so `children's` keeps a lower-case `s`).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;

    for ch in text.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            out.push(ch);
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Write entries as CSV, replacing whatever is at `path`.
///
/// The containing directory is created when absent.
pub fn write_table(path: &Path, entries: &[PrizeEntry]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut staged = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = csv::Writer::from_writer(staged.as_file_mut());
        if entries.is_empty() {
            writer.write_record(TABLE_COLUMNS)?;
        }
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
    }
    staged.as_file_mut().flush()?;
    // The staged file is created owner-only; give the table the mode a plain
    // `File::create` would.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(TABLE_FILE_MODE))?;
    }
    staged.persist(path)?;
    Ok(())
}

#[cfg(unix)]
const TABLE_FILE_MODE: u32 = 0o644;

/// Header of the normalized table, matching [`PrizeEntry`]'s field order.
pub const TABLE_COLUMNS: &[&str] = &[
    "prize_id",
    "prize_name",
    "prize_alias",
    "prize_institution",
    "prize_year",
    "prize_genre",
    "person_id",
    "first_name",
    "last_name",
    "gender",
    "uk_residence",
    "ethnicity_macro",
    "highest_degree",
    "degree_field_cat",
    "degree_institution",
    "degree_field",
    "role_simple",
    "person_role",
    "book_id",
    "book_title",
];

fn report_for(entries: &[PrizeEntry]) -> CleanReport {
    let mut report = CleanReport {
        rows_written: entries.len(),
        ..CleanReport::default()
    };
    for e in entries {
        *report.roles.entry(e.role_simple).or_default() += 1;
        report.missing_substitutions += [&e.gender, &e.ethnicity_macro, &e.highest_degree]
            .iter()
            .filter(|c| ***c == Category::Missing)
            .count();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(genre: &str, gender: &str, role: &str) -> RawRecord {
        RawRecord {
            prize_id: "1".into(),
            prize_name: "Booker Prize".into(),
            prize_alias: "Booker".into(),
            prize_institution: "Booker Foundation".into(),
            prize_year: 2020,
            prize_genre: genre.into(),
            person_id: "p1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            gender: gender.into(),
            uk_residence: true,
            ethnicity_macro: "".into(),
            highest_degree: "Postgraduate".into(),
            degree_field_cat: "Humanities".into(),
            degree_institution: "Oxford".into(),
            degree_field: "English".into(),
            person_role: role.into(),
            book_id: "b1".into(),
            book_title: "Notes".into(),
        }
    }

    #[test]
    fn genre_is_title_cased() {
        assert_eq!(title_case("fiction"), "Fiction");
        assert_eq!(title_case("  POETRY "), "Poetry");
        assert_eq!(title_case("non-fiction"), "Non-Fiction");
        assert_eq!(title_case("children's"), "Children's");
        assert_eq!(title_case("young adult fiction"), "Young Adult Fiction");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn blank_categoricals_become_missing() {
        let entry = clean_record(&raw("fiction", "", "Winner"));
        assert_eq!(entry.gender, Category::Missing);
        assert_eq!(entry.ethnicity_macro, Category::Missing);
        assert_eq!(entry.highest_degree, Category::Known("Postgraduate".into()));
    }

    #[test]
    fn role_is_derived_and_raw_text_kept() {
        let entry = clean_record(&raw("fiction", "woman", "Short-listed nominee"));
        assert_eq!(entry.role_simple, RoleSimple::Shortlisted);
        assert_eq!(entry.person_role, "Short-listed nominee");
    }

    #[test]
    fn report_counts_roles_and_substitutions() {
        let entries = clean_records(&[
            raw("fiction", "", "winner"),
            raw("poetry", "man", "shortlisted"),
            raw("poetry", "man", "judge"),
        ]);
        let report = report_for(&entries);
        assert_eq!(report.rows_written, 3);
        assert_eq!(report.roles[&RoleSimple::Winner], 1);
        assert_eq!(report.roles[&RoleSimple::Shortlisted], 1);
        assert_eq!(report.roles[&RoleSimple::Other], 1);
        // one blank gender plus three blank ethnicities
        assert_eq!(report.missing_substitutions, 4);
    }

    #[test]
    fn table_columns_follow_entry_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_table(&path, &clean_records(&[raw("fiction", "man", "winner")])).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, TABLE_COLUMNS.join(","));
    }

    #[cfg(unix)]
    #[test]
    fn written_table_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_table(&path, &clean_records(&[raw("fiction", "man", "winner")])).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, TABLE_FILE_MODE);
    }
}
