// src/bin/verify.rs

use anyhow::{anyhow, Result};
use txmarkers::convert::{verify, ConvertPaths};

fn main() -> Result<()> {
    let paths = ConvertPaths::default();
    let report = verify(&paths)?;

    println!("\n{: <40} {:>10}", "Artifact", "Records");
    println!("{:-<51}", "");
    println!("{: <40} {:>10}", paths.input.display(), report.csv_rows);
    println!("{: <40} {:>10}", paths.json.display(), report.json_records);
    println!("{: <40} {:>10}", paths.gzip.display(), report.gzip_records);

    if !report.is_consistent() {
        return Err(anyhow!(
            "outputs are stale or disagree (identical records: {})",
            report.identical
        ));
    }
    Ok(())
}
