//! Truth-table printing and report files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use genmap_techmap::{MappedCircuit, TruthTable};

/// Writes the table with analog columns first, then binary columns.
pub fn write_truth_table(table: &TruthTable, out: &mut impl Write) -> io::Result<()> {
    let (names, values) = table.activity();
    let (labels, bits) = table.logic();
    let width = names
        .iter()
        .map(|n| n.len())
        .chain(labels.iter().map(String::len))
        .max()
        .unwrap_or(0)
        .max(9);

    for name in &names {
        write!(out, "{name:>width$} ")?;
    }
    for label in &labels {
        write!(out, "{label:>width$} ")?;
    }
    writeln!(out)?;
    for (scores, row_bits) in values.iter().zip(&bits) {
        for v in scores {
            write!(out, "{:>width$} ", format!("{v:.2e}"))?;
        }
        for b in row_bits {
            write!(out, "{:>width$} ", b.as_bit())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes `<name>_activity-table.csv`: the analog section, a blank line, then
/// the binary section.
pub fn write_activity_table(dir: &Path, name: &str, table: &TruthTable) -> io::Result<PathBuf> {
    let (names, values) = table.activity();
    let (labels, bits) = table.logic();
    let (path, mut file) = create_report(dir, &format!("{name}_activity-table.csv"))?;

    let mut analog = csv::Writer::from_writer(&mut file);
    analog.write_record(&names)?;
    for scores in &values {
        analog.write_record(scores.iter().map(|v| format!("{v:.2e}")))?;
    }
    analog.flush()?;
    drop(analog);
    file.write_all(b"\n")?;

    let mut binary = csv::Writer::from_writer(&mut file);
    binary.write_record(&labels)?;
    for row_bits in &bits {
        binary.write_record(row_bits.iter().map(|b| b.as_bit().to_string()))?;
    }
    binary.flush()?;
    Ok(path)
}

/// Writes `<name>_circuit-score.csv`: the circuit score, then one line per
/// output device.
pub fn write_circuit_score(
    dir: &Path,
    name: &str,
    score: f64,
    circuit: &MappedCircuit,
) -> io::Result<PathBuf> {
    let (path, file) = create_report(dir, &format!("{name}_circuit-score.csv"))?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["circuit_score".to_string(), score.to_string()])?;
    for (binding, device_score) in circuit.outputs.iter().zip(&circuit.device_scores) {
        wtr.write_record([binding.part.clone(), device_score.to_string()])?;
    }
    wtr.flush()?;
    Ok(path)
}

fn create_report(dir: &Path, file: &str) -> io::Result<(PathBuf, BufWriter<File>)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file);
    let file = File::create(&path)?;
    Ok((path, BufWriter::new(file)))
}

/// Writes the part bound to every role, one per line.
pub fn write_bindings(circuit: &MappedCircuit, out: &mut impl Write) -> io::Result<()> {
    for (kind, bindings) in [
        ("input", &circuit.inputs),
        ("gate", &circuit.gates),
        ("output", &circuit.outputs),
    ] {
        for b in bindings {
            writeln!(out, "  {kind:<6} {:<12} -> {}", b.role, b.part)?;
        }
    }
    Ok(())
}
