use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

// prize_id, prize_name, prize_alias, prize_institution, raw genre text
const PRIZES: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "Booker Prize", "Booker", "Booker Prize Foundation", "fiction"),
    ("2", "Forward Prize for Best Collection", "Forward", "Forward Arts Foundation", "poetry"),
    ("3", "Baillie Gifford Prize", "Baillie Gifford", "Baillie Gifford", "non-fiction"),
    ("4", "Women's Prize for Fiction", "Women's Prize", "Women's Prize Trust", "FICTION"),
    ("5", "Costa Children's Book Award", "Costa Children's", "Costa Coffee", "children's"),
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Ben", "Chidi", "Dora", "Ewan", "Farah", "George", "Hilary", "Ian", "Jeanette",
    "Kazuo", "Lola", "Maggie", "Nadeem", "Olive", "Pat", "Quentin", "Rosa", "Salman", "Tessa",
];
const LAST_NAMES: &[&str] = &[
    "Abbott", "Baker", "Chen", "Doyle", "Evans", "Fraser", "Gupta", "Hughes", "Ishaq", "Jones",
    "Khan", "Lewis", "Mantel", "Nwosu", "Owen", "Price", "Quinn", "Reid", "Smith", "Taylor",
];
const GENDERS: &[&str] = &["woman", "man", "non-binary", ""];
const ETHNICITIES: &[&str] = &["White British", "White Other", "Non-White", ""];
const DEGREES: &[&str] = &["Postgraduate", "Undergraduate", "No degree", ""];
const FIELDS: &[&str] = &["Humanities", "Social Sciences", "STEM", "Arts", ""];
const INSTITUTIONS: &[&str] = &["Oxford", "Cambridge", "UCL", "Edinburgh", "Other"];
const WINNER_ROLES: &[&str] = &["Winner", "WINNER", "winner"];
const SHORTLIST_ROLES: &[&str] = &["Shortlisted", "short-listed", "Short-listed nominee", "shortlist"];
const TITLE_WORDS: &[&str] = &[
    "Silent", "River", "Glass", "Summer", "House", "Light", "Winter", "Garden", "Salt", "Orchard",
];

const COLUMNS: &[&str] = &[
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
    "degree_field_category",
    "degree_institution",
    "degree_field",
    "person_role",
    "book_id",
    "book_title",
];

const PEOPLE: usize = 150;

struct Row {
    prize: (&'static str, &'static str, &'static str, &'static str, &'static str),
    year: i64,
    person: usize,
    uk: bool,
    role: &'static str,
    book: usize,
    title: String,
}

struct Person {
    first: &'static str,
    last: &'static str,
    gender: &'static str,
    ethnicity: &'static str,
    degree: &'static str,
    field: &'static str,
    institution: &'static str,
}

fn generate(rng: &mut SimpleRng) -> (Vec<Person>, Vec<Row>) {
    let people: Vec<Person> = (0..PEOPLE)
        .map(|_| Person {
            first: rng.pick(FIRST_NAMES),
            last: rng.pick(LAST_NAMES),
            gender: rng.pick(GENDERS),
            ethnicity: rng.pick(ETHNICITIES),
            degree: rng.pick(DEGREES),
            field: rng.pick(FIELDS),
            institution: rng.pick(INSTITUTIONS),
        })
        .collect();

    let mut rows = Vec::new();
    let mut book = 0;
    for &prize in PRIZES {
        for year in 2000..=2023 {
            let shortlist = 3 + rng.below(3);
            for slot in 0..=shortlist {
                let role = match slot {
                    0 => rng.pick(WINNER_ROLES),
                    _ if rng.below(10) == 0 => "Longlisted",
                    _ => rng.pick(SHORTLIST_ROLES),
                };
                book += 1;
                rows.push(Row {
                    prize,
                    year,
                    person: rng.below(PEOPLE),
                    uk: rng.below(4) != 0,
                    role,
                    book,
                    title: format!("The {} {}", rng.pick(TITLE_WORDS), rng.pick(TITLE_WORDS)),
                });
            }
        }
    }
    (people, rows)
}

/// Cell text per column, in [`COLUMNS`] order.
fn cells(people: &[Person], row: &Row) -> Vec<String> {
    let p = &people[row.person];
    let (id, name, alias, institution, genre) = row.prize;
    vec![
        id.to_string(),
        name.to_string(),
        alias.to_string(),
        institution.to_string(),
        row.year.to_string(),
        genre.to_string(),
        format!("p{}", row.person),
        p.first.to_string(),
        p.last.to_string(),
        p.gender.to_string(),
        row.uk.to_string(),
        p.ethnicity.to_string(),
        p.degree.to_string(),
        p.field.to_string(),
        p.institution.to_string(),
        if p.field.is_empty() { String::new() } else { format!("{} (general)", p.field) },
        row.role.to_string(),
        format!("b{}", row.book),
        row.title.clone(),
    ]
}

fn write_csv(path: &Path, people: &[Person], rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(cells(people, row))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, people: &[Person], rows: &[Row]) -> Result<()> {
    let table: Vec<Vec<String>> = rows.iter().map(|r| cells(people, r)).collect();
    let column = |i: usize| -> Vec<String> { table.iter().map(|r| r[i].clone()).collect() };

    let mut fields = Vec::with_capacity(COLUMNS.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(COLUMNS.len());
    for (i, name) in COLUMNS.iter().enumerate() {
        match *name {
            "prize_year" => {
                fields.push(Field::new(*name, DataType::Int64, false));
                arrays.push(Arc::new(Int64Array::from(
                    rows.iter().map(|r| r.year).collect::<Vec<_>>(),
                )));
            }
            "uk_residence" => {
                fields.push(Field::new(*name, DataType::Boolean, false));
                arrays.push(Arc::new(BooleanArray::from(
                    rows.iter().map(|r| r.uk).collect::<Vec<_>>(),
                )));
            }
            _ => {
                // Blank categoricals are stored as nulls, as dataframe exports do.
                let values: Vec<Option<String>> = column(i)
                    .into_iter()
                    .map(|v| if v.is_empty() { None } else { Some(v) })
                    .collect();
                fields.push(Field::new(*name, DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from(values)));
            }
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/raw/prizes.csv"));

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let (people, rows) = generate(&mut rng);

    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&output_path, &people, &rows)?,
        "parquet" | "pq" => write_parquet(&output_path, &people, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} raw prize records to {}", rows.len(), output_path.display());
    Ok(())
}
