#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use prize_dashboard::{Category, PrizeEntry, PrizeTable, RoleSimple};
use tempfile::TempDir;

pub const RAW_HEADER: &str = "prize_id,prize_name,prize_alias,prize_institution,prize_year,prize_genre,\
person_id,first_name,last_name,gender,uk_residence,ethnicity_macro,highest_degree,\
degree_field_category,degree_institution,degree_field,person_role,book_id,book_title";

/// Raw rows covering title casing, blank categoricals and every role rule.
pub const RAW_ROWS: &[&str] = &[
    "1,Booker Prize,Booker,Booker Foundation,2019,fiction,p1,Ada,Abbott,woman,TRUE,White British,Postgraduate,Humanities,Oxford,English,Winner,b1,Salt House",
    "1,Booker Prize,Booker,Booker Foundation,2019,FICTION,p2,Ben,Baker,,FALSE,,,Humanities,UCL,History,Short-listed nominee,b2,River Glass",
    "2,Forward Prize,Forward,Forward Arts,2020,poetry,p3,Chidi,Chen,man,TRUE,Non-White,Undergraduate,Arts,Edinburgh,Fine Art,WINNER,b3,Summer Light",
    "2,Forward Prize,Forward,Forward Arts,2020,poetry,p1,Ada,Abbott,woman,TRUE,White British,Postgraduate,Humanities,Oxford,English,Longlisted,b4,Winter Garden",
    "3,Baillie Gifford,BG,Baillie Gifford,2021,non-fiction,p4,Dora,Doyle,non-binary,,White Other,,STEM,Cambridge,Physics,shortlisted,b5,\"Orchard, Salt\"",
];

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        Self { _tmp: tmp, root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write the standard raw fixture and return its path.
    pub fn raw_csv(&self) -> PathBuf {
        let path = self.path("raw/prizes.csv");
        write_raw_csv(&path, RAW_HEADER, RAW_ROWS);
        path
    }
}

pub fn write_raw_csv(path: &Path, header: &str, rows: &[&str]) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("create raw dir");
    }
    let mut text = String::from(header);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(path, text).expect("write raw csv");
}

/// Write the same rows as a Parquet file the way dataframe exports do:
/// `prize_year` as Int64, `uk_residence` as a nullable Boolean, everything
/// else as nullable Utf8 with blank cells stored as nulls.
pub fn write_raw_parquet(path: &Path, header: &str, rows: &[&str]) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("create raw dir");
    }
    let names: Vec<&str> = header.split(',').collect();
    let mut text = String::new();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let records: Vec<csv::StringRecord> = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .collect::<Result<_, _>>()
        .expect("parse fixture rows");

    let mut fields = Vec::with_capacity(names.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let cells = records.iter().map(|r| r.get(i).unwrap_or("").trim());
        match *name {
            "prize_year" => {
                let years: Vec<i64> = cells.map(|c| c.parse().expect("year")).collect();
                fields.push(Field::new(*name, DataType::Int64, false));
                arrays.push(Arc::new(Int64Array::from(years)));
            }
            "uk_residence" => {
                let flags: Vec<Option<bool>> = cells
                    .map(|c| match c.to_ascii_lowercase().as_str() {
                        "" => None,
                        other => Some(other == "true"),
                    })
                    .collect();
                fields.push(Field::new(*name, DataType::Boolean, true));
                arrays.push(Arc::new(BooleanArray::from(flags)));
            }
            _ => {
                let values: Vec<Option<&str>> =
                    cells.map(|c| (!c.is_empty()).then_some(c)).collect();
                fields.push(Field::new(*name, DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from(values)));
            }
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("record batch");
    let file = fs::File::create(path).expect("create parquet file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("parquet writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close parquet writer");
}

/// A cleaned entry with sensible defaults; override fields as needed.
pub fn entry(year: i32, genre: &str, person: &str, book: &str) -> PrizeEntry {
    PrizeEntry {
        prize_id: "10".into(),
        prize_name: "Test Prize".into(),
        prize_alias: "Test".into(),
        prize_institution: "Test Trust".into(),
        prize_year: year,
        prize_genre: genre.into(),
        person_id: person.into(),
        first_name: "First".into(),
        last_name: "Last".into(),
        gender: Category::Known("Woman".into()),
        uk_residence: true,
        ethnicity_macro: Category::Missing,
        highest_degree: Category::Known("Postgraduate".into()),
        degree_field_cat: "Humanities".into(),
        degree_institution: "Oxford".into(),
        degree_field: "English".into(),
        role_simple: RoleSimple::Winner,
        person_role: "Winner".into(),
        book_id: book.into(),
        book_title: format!("Title {book}"),
    }
}

/// Rows for 2019–2023 across Fiction and Poetry with mixed roles, genders and
/// residency.
pub fn five_year_table() -> PrizeTable {
    let mut entries = Vec::new();
    for (i, year) in (2019..=2023).enumerate() {
        let mut fiction = entry(year, "Fiction", &format!("f{}", i % 3), &format!("fb{i}"));
        fiction.role_simple = if i % 2 == 0 { RoleSimple::Winner } else { RoleSimple::Shortlisted };
        fiction.uk_residence = i % 2 == 0;
        entries.push(fiction);

        let mut poetry = entry(year, "Poetry", &format!("p{i}"), &format!("pb{i}"));
        poetry.gender = if i == 1 { Category::Missing } else { Category::Known("Man".into()) };
        poetry.highest_degree = if i == 2 { Category::Missing } else { Category::Known("Undergraduate".into()) };
        poetry.role_simple = RoleSimple::Other;
        entries.push(poetry);

        if year == 2020 {
            // a second Fiction entry for the same book, shortlisted
            let mut again = entry(year, "Fiction", "f9", &format!("fb{i}"));
            again.role_simple = RoleSimple::Shortlisted;
            entries.push(again);
        }
    }
    PrizeTable::from_entries(entries)
}
