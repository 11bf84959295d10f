use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

use studio_insights::data::coerce::MONTH_NAMES;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const LOCATIONS: [&str; 3] = ["Kwality House, Kemps Corner", "Supreme HQ, Bandra", "Kenkere House"];
const TRAINERS: [&str; 5] = ["Anisha Shah", "Rohan Dahima", "Mira Kapoor", "Karan Bhatia", "Pranjali Jain"];
const CLASSES: [(&str, &str); 5] = [
    ("Studio Barre 57", "Barre"),
    ("Studio PowerCycle", "Cycle"),
    ("Studio Strength Lab", "Strength"),
    ("Studio Mat 57", "Barre"),
    ("Studio FIT", "Strength"),
];
const TIMES: [&str; 5] = ["07:00", "08:00", "09:30", "18:00", "19:30"];

/// Header shared by both session exports.
const SESSION_HEADER: [&str; 12] = [
    "Unique ID 1",
    "Unique ID 2",
    "Date",
    "Day",
    "Time",
    "Location",
    "Class",
    "Type",
    "Trainer",
    "Capacity",
    "Fill %",
    "Revenue",
];

fn session_row(rng: &mut SimpleRng, id: usize, date: NaiveDate) -> Vec<String> {
    let (class, kind) = CLASSES[rng.below(CLASSES.len())];
    let capacity = 10 + rng.below(16);
    let fill = (rng.next_f64() * 100.0).round();
    let revenue = (capacity as f64 * fill / 100.0 * 1200.0).round();
    vec![
        format!("S{:04}", id),
        date.format("%Y%m%d").to_string(),
        date.format("%Y-%m-%d").to_string(),
        date.format("%A").to_string(),
        rng.pick(&TIMES).to_string(),
        rng.pick(&LOCATIONS).to_string(),
        class.to_string(),
        kind.to_string(),
        rng.pick(&TRAINERS).to_string(),
        capacity.to_string(),
        format!("{fill}%"),
        // sheets export money with grouping separators
        group_thousands(revenue as u64),
    ]
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn write_sessions(rng: &mut SimpleRng) -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;
    let rows: Vec<Vec<String>> = (0..120)
        .map(|i| session_row(rng, i, start + Duration::days(i as i64 / 2)))
        .collect();

    // The teacher export repeats a third of the recurring sessions.
    let mut recurring = csv::Writer::from_path("recurring_sessions.csv")?;
    let mut teacher = csv::Writer::from_path("teacher_sessions.csv")?;
    recurring.write_record(SESSION_HEADER)?;
    teacher.write_record(SESSION_HEADER)?;
    for (i, row) in rows.iter().enumerate() {
        if i < 90 {
            recurring.write_record(row)?;
        }
        if i >= 60 {
            teacher.write_record(row)?;
        }
    }
    recurring.flush()?;
    teacher.flush()?;
    println!("Wrote recurring_sessions.csv and teacher_sessions.csv (120 sessions, 30 shared)");
    Ok(())
}

fn write_payroll(rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path("payroll.csv")?;
    let mut header = vec!["Teacher ID", "Teacher Name", "Teacher Email", "Location"];
    let families = ["Cycle", "Strength", "Barre", "Total"];
    let metrics = ["Sessions", "Empty Sessions", "Non-Empty Sessions", "Customers", "Paid"];
    let family_headers: Vec<String> = families
        .iter()
        .flat_map(|f| metrics.iter().map(move |m| format!("{f} {m}")))
        .collect();
    header.extend(family_headers.iter().map(String::as_str));
    header.extend(["Month Year", "Unique", "Converted", "Conversion", "Retained", "Retention", "New"]);
    writer.write_record(&header)?;

    let mut rows = 0;
    for month in 0..12u32 {
        let first = NaiveDate::from_ymd_opt(2024, month + 1, 1).context("payroll month")?;
        let label = format!("{} {}", MONTH_NAMES[first.month0() as usize], first.year());
        for (t, trainer) in TRAINERS.iter().enumerate() {
            let mut record = vec![
                format!("T{:02}", t + 1),
                trainer.to_string(),
                format!("{}@example.com", trainer.split(' ').next().unwrap_or("coach").to_lowercase()),
                LOCATIONS[t % LOCATIONS.len()].to_string(),
            ];
            let mut total = [0u64; 5];
            for _ in 0..3 {
                let sessions = rng.below(20) as u64;
                let empty = rng.below(sessions as usize + 1) as u64;
                let customers = (sessions - empty) * (3 + rng.below(10) as u64);
                let paid = sessions * 1500;
                let quintuple = [sessions, empty, sessions - empty, customers, paid];
                for (acc, v) in total.iter_mut().zip(quintuple) {
                    *acc += v;
                }
                record.extend(quintuple.iter().map(|v| group_thousands(*v)));
            }
            record.extend(total.iter().map(|v| group_thousands(*v)));

            let unique = total[3] / 2;
            let converted = rng.below(unique as usize + 1) as u64;
            let retained = rng.below(unique as usize + 1) as u64;
            let pct = |part: u64| {
                if unique == 0 {
                    "0%".to_string()
                } else {
                    format!("{:.1}%", part as f64 * 100.0 / unique as f64)
                }
            };
            record.extend([
                label.clone(),
                unique.to_string(),
                converted.to_string(),
                pct(converted),
                retained.to_string(),
                pct(retained),
                rng.below(8).to_string(),
            ]);
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    println!("Wrote payroll.csv ({rows} trainer-months)");
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    write_sessions(&mut rng)?;
    write_payroll(&mut rng)?;
    Ok(())
}
