//! Writes deterministic demo workbooks for both dashboards:
//! `lifecycle_sample.xlsx`, `cost_sample.xlsx` and `energy_sample.xlsx`.

use rust_xlsxwriter::{Workbook, XlsxError};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const SCENARIOS: &[&str] = &[
    "Germany Owner City",
    "Germany Shuttle",
    "China Owner City",
    "Poland Car Sharing",
];
const YEARS: &[i64] = &[2020, 2030, 2040];
const CAR_TYPES: &[&str] = &["BEV", "Diesel", "FCEV"];
const INDICATORS: &[&str] = &[
    "Climate change - Total",
    "Land use",
    "Water scarcity",
    "Fossils",
];
const FLOWS: &[&str] = &[
    "Bauteil Tür (eingebaut)_Funier-50/50-Stahl",
    "Bauteil Tür (eingebaut)_Stahl A-50/50-Stahl B",
    "Serienbauteil Hutprofil (eingebaut)",
    "Hybridbauteil Hutprofil (eingebaut)",
];
const PHASES: &[(&str, &[&str])] = &[
    ("Material", &["Steel sheet", "Veneer", "Adhesive"]),
    ("Production", &["Stamping", "Welding", "Coating"]),
    ("Nutzung", &["Driving", "Maintenance"]),
    ("End-of-Life", &["Dismantling", "Recycling"]),
];

fn write_lifecycle_sample(rng: &mut SimpleRng) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "Country",
        "Year",
        "Car Type",
        "ReferenceFlow",
        "Quantity",
        "LifeCyclePhase",
        "Indicator",
        "Process",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    let mut row: u32 = 1;
    for scenario in SCENARIOS {
        for year in YEARS {
            for car_type in CAR_TYPES {
                for indicator in INDICATORS {
                    for (fi, flow) in FLOWS.iter().enumerate() {
                        let (phase, processes) = *rng.pick(PHASES);
                        let quantity =
                            (fi as f64 + 1.0) * 10.0 + (*year - 2020) as f64 * 0.5
                                + rng.next_f64() * 5.0;
                        sheet.write_string(row, 0, *scenario)?;
                        sheet.write_number(row, 1, *year as f64)?;
                        sheet.write_string(row, 2, *car_type)?;
                        sheet.write_string(row, 3, *flow)?;
                        sheet.write_number(row, 4, quantity)?;
                        sheet.write_string(row, 5, phase)?;
                        sheet.write_string(row, 6, *indicator)?;
                        sheet.write_string(row, 7, *rng.pick(processes))?;
                        row += 1;
                    }
                }
            }
        }
    }

    workbook.save("lifecycle_sample.xlsx")?;
    println!("Wrote {} data rows to lifecycle_sample.xlsx", row - 1);
    Ok(())
}

fn write_cost_sample(rng: &mut SimpleRng) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "Hybrid_M", "KostM", "Hybrid_P", "KostP", "Hybrid_N", "KostN", "Hybrid_E", "KostE",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    let material = ["Steel", "Veneer", "Adhesive"];
    let production = ["Stamping", "Welding", "Coating"];
    let usage = ["Fuel", "Maintenance", "Insurance"];
    let end_of_life = ["Dismantling", "Recycling credit", "Landfill"];

    for row in 1..=12u32 {
        sheet.write_string(row, 0, *rng.pick(&material))?;
        sheet.write_number(row, 1, 40.0 + rng.next_f64() * 60.0)?;
        sheet.write_string(row, 2, *rng.pick(&production))?;
        sheet.write_number(row, 3, 15.0 + rng.next_f64() * 25.0)?;
        sheet.write_string(row, 4, *rng.pick(&usage))?;
        sheet.write_number(row, 5, 10.0 + rng.next_f64() * 20.0)?;
        let eol = *rng.pick(&end_of_life);
        // Recycling pays back
        let eol_cost = if eol == "Recycling credit" {
            -(5.0 + rng.next_f64() * 10.0)
        } else {
            3.0 + rng.next_f64() * 8.0
        };
        sheet.write_string(row, 6, eol)?;
        sheet.write_number(row, 7, eol_cost)?;
    }

    workbook.save("cost_sample.xlsx")?;
    println!("Wrote 12 cost rows to cost_sample.xlsx");
    Ok(())
}

fn write_energy_sample(rng: &mut SimpleRng) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in ["Datum", "Energiequelle", "Maschine", "Verbrauch"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header)?;
    }

    let sources = [
        "Gas",
        "Elektrische Energie",
        "Waermeenergie",
        "Druckluft",
        "Oel",
        "Kuehlwasser",
        "Heizwasser",
        "Wasser",
    ];

    let mut row: u32 = 1;
    for day in 1..=7u32 {
        for hour in [6u32, 14, 22] {
            for source in sources {
                for machine in 1..=5u32 {
                    let value = 2.0 + rng.next_f64() * 10.0;
                    sheet.write_string(row, 0, format!("{day:02}-03-2024 {hour:02}:00:00"))?;
                    sheet.write_string(row, 1, source)?;
                    sheet.write_string(row, 2, format!("Maschine {machine}"))?;
                    sheet.write_number(row, 3, value)?;
                    row += 1;
                }
            }
        }
    }

    workbook.save("energy_sample.xlsx")?;
    println!("Wrote {} consumption rows to energy_sample.xlsx", row - 1);
    Ok(())
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);
    write_lifecycle_sample(&mut rng)?;
    write_cost_sample(&mut rng)?;
    write_energy_sample(&mut rng)?;
    Ok(())
}
