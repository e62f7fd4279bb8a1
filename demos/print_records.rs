//! Prints the measurements of the `LTE_QoS` job found in a gzip compressed
//! collection file, one line per counter.
//!
//! run example with:
//!    cargo run --example print_records --features="gzip" -- A20000626.xml.gz
//!
//! Set `RUST_LOG=debug` to see which subtrees are skipped.

use meas_collec::{reader, Attributes, BoxError, Handler, Record};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./input.gz".to_string());

    let mut printed = 0;
    let mut handler = Handler::new(|name: &str, stack: &[Record]| -> Result<(), BoxError> {
        match stack {
            [.., Record::MeasData(data), Record::MeasInfo(info), Record::MeasValue(value)] => {
                let types = info.meas_types.iter().flatten();
                let results = value.meas_results.iter().flatten();
                for (counter, result) in types.zip(results) {
                    println!(
                        "{} | {} | {} | {} = {}",
                        data.local_dn.as_deref().unwrap_or("-"),
                        info.end_time.as_deref().unwrap_or("-"),
                        value.meas_obj_ldn,
                        counter,
                        result
                    );
                    printed += 1;
                }
            }
            [Record::MeasCollecFile(file)] => {
                println!(
                    "{} from {} ({} .. {})",
                    name,
                    file.vendor_name.as_deref().unwrap_or("unknown vendor"),
                    file.begin_time.as_deref().unwrap_or("?"),
                    file.end_time.as_deref().unwrap_or("?"),
                );
            }
            _ => {}
        }
        Ok(())
    })
    .with_filter(|name: &str, attrs: &Attributes, _: &[Record]| {
        let other_job = name == "measInfo" && attrs.get("measInfoId") != Some("LTE_QoS");
        Ok(other_job.then(|| name.to_owned()))
    });

    reader::parse_gzip_file(&path, &mut handler)?;
    drop(handler);

    println!("{} counters", printed);
    Ok(())
}
