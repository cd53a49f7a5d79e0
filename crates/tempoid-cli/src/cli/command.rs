use anyhow::Context;
use std::io::Write;
use tempoid::{SnowflakeGenerator, SnowflakeId, TimeSource};

use crate::cli::config::Command;

/// Runs one subcommand against `generator`, writing its result to `out`.
pub fn run<T, W>(
    generator: &SnowflakeGenerator<T>,
    command: &Command,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: TimeSource,
    W: Write,
{
    match command {
        Command::Generate { count } => {
            let ids = generator
                .generate_many(*count)
                .context("failed to generate ids")?;
            tracing::debug!(count = ids.len(), "generated ids");
            if json {
                serde_json::to_writer(&mut *out, &ids)?;
                writeln!(out)?;
            } else {
                for id in ids {
                    writeln!(out, "{id}")?;
                }
            }
        }
        Command::Decode { id } => {
            let id: SnowflakeId = id.parse().with_context(|| format!("cannot decode {id:?}"))?;
            let decoded = generator.decode(id.to_raw())?;
            if json {
                serde_json::to_writer(&mut *out, &decoded)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{decoded}")?;
            }
        }
        Command::Validate { id } => {
            let valid = id
                .parse::<u64>()
                .is_ok_and(|raw| generator.is_valid(raw));
            if json {
                serde_json::to_writer(&mut *out, &serde_json::json!({ "id": id, "valid": valid }))?;
                writeln!(out)?;
            } else {
                writeln!(out, "{valid}")?;
            }
        }
        Command::Stats { count } => {
            // opens the rate window
            generator.snapshot();
            generator
                .generate_many(*count)
                .context("failed to generate ids")?;
            let snapshot = generator.snapshot();
            if json {
                serde_json::to_writer_pretty(&mut *out, &snapshot)?;
                writeln!(out)?;
            } else {
                writeln!(out, "total_generated: {}", snapshot.total_generated)?;
                writeln!(out, "clock_backward_events: {}", snapshot.clock_backward_events)?;
                writeln!(out, "sequence_overflow_waits: {}", snapshot.sequence_overflow_waits)?;
                writeln!(out, "last_timestamp_millis: {}", snapshot.last_timestamp_millis)?;
                writeln!(out, "current_timestamp_millis: {}", snapshot.current_timestamp_millis)?;
                writeln!(out, "tolerance_millis: {}", snapshot.tolerance_millis)?;
                match snapshot.ids_per_second {
                    Some(rate) => writeln!(out, "ids_per_second: {rate:.0}")?,
                    None => writeln!(out, "ids_per_second: n/a")?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempoid::GeneratorConfig;

    struct FixedTime;

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            1_721_433_600_005
        }
    }

    fn output(command: Command, json: bool) -> String {
        let generator = SnowflakeGenerator::new(GeneratorConfig::default(), FixedTime);
        let mut out = Vec::new();
        run(&generator, &command, json, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn generate_prints_one_id_per_line() {
        let text = output(Command::Generate { count: 3 }, false);
        assert_eq!(text, "20971520\n20971521\n20971522\n");
    }

    #[test]
    fn generate_json_is_an_array() {
        let text = output(Command::Generate { count: 2 }, true);
        assert_eq!(text, "[20971520,20971521]\n");
    }

    #[test]
    fn decode_plain_and_json() {
        let id = String::from("20971527");
        assert_eq!(
            output(Command::Decode { id: id.clone() }, false),
            "20971527 (ts=1721433600005, seq=7)\n"
        );

        let value: serde_json::Value =
            serde_json::from_str(&output(Command::Decode { id }, true)).unwrap();
        assert_eq!(value["timestamp_offset"], 5);
        assert_eq!(value["sequence"], 7);
    }

    #[test]
    fn decode_rejects_garbage() {
        let generator = SnowflakeGenerator::new(GeneratorConfig::default(), FixedTime);
        let command = Command::Decode { id: "-5".into() };
        assert!(run(&generator, &command, false, &mut Vec::new()).is_err());
    }

    #[test]
    fn validate_reports_without_failing() {
        assert_eq!(output(Command::Validate { id: "20971527".into() }, false), "true\n");
        // one millisecond in the future of the fixed clock
        let future = (6_u64 << 22).to_string();
        assert_eq!(output(Command::Validate { id: future }, false), "false\n");
        assert_eq!(output(Command::Validate { id: "nope".into() }, false), "false\n");
    }

    #[test]
    fn stats_json_counts_generated_ids() {
        let value: serde_json::Value =
            serde_json::from_str(&output(Command::Stats { count: 25 }, true)).unwrap();
        assert_eq!(value["total_generated"], 25);
        assert_eq!(value["tolerance_millis"], 5);
        // the fixed clock never advances between snapshots
        assert!(value["ids_per_second"].is_null());
    }
}
