//! CSV files on disk for the runtime tests.

use std::io::Write;
use std::path::Path;

use insight_core::DatasetKind;

fn write_file(dir: &Path, kind: DatasetKind, body: &str) {
    let header = kind
        .schema()
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",");
    // Write beside the target and rename, so a concurrent reload never reads
    // a half-written file.
    let staging = dir.join(format!("{}.tmp", kind.file_name()));
    let mut file = std::fs::File::create(&staging).unwrap();
    writeln!(file, "{header}").unwrap();
    write!(file, "{body}").unwrap();
    drop(file);
    std::fs::rename(&staging, dir.join(kind.file_name())).unwrap();
}

pub fn write_financial(dir: &Path, body: &str) {
    write_file(dir, DatasetKind::Financial, body);
}

/// Two fiscal years so every view, the narrative included, can render.
pub fn write_all(dir: &Path) {
    write_financial(
        dir,
        "2023,Q4,Wayne Tech,80,16,8,20,1000\n2024,Q1,Wayne Tech,100,20,10,22,1100\n",
    );
    write_file(dir, DatasetKind::Hr, "2024-01-31,Engineering,Senior,90,8,40,4.2\n");
    write_file(
        dir,
        DatasetKind::Security,
        "2023-12-31,Downtown,5,8,70,60,80\n2024-01-31,Downtown,3,7.5,82,70,88\n",
    );
    write_file(
        dir,
        DatasetKind::Rd,
        "RD001,Quantum Armor,Wayne Tech,Active,10,4,Very High,90,Top Secret\n",
    );
    write_file(
        dir,
        DatasetKind::SupplyChain,
        "2024-01-31,Gotham,Electronics,97,150000,12,4.5,A,20,6.1,300,1\n",
    );
}
