//! Command-line driver: apply gates or load a demo, print the result as
//! JSON and write the rendered audio to a WAV file.
//!
//! Usage: qsynth [--demo NAME] [--preset NAME] [--config FILE] [--out FILE] [GATE...]
//! where GATE is `h0`, `x1` or `cnot0,1`.

use std::path::PathBuf;
use std::process::ExitCode;

use qsynth_lib::quantum::{GateKind, GateRequest, VoiceTable};
use qsynth_lib::{CircuitSynthesizer, Demo, Settings, SynthError, SynthPreset};

#[derive(Debug, Default)]
struct Args {
    demo: Option<String>,
    preset: Option<String>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    gates: Vec<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--demo" => args.demo = Some(value("--demo")?),
            "--preset" => args.preset = Some(value("--preset")?),
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--out" => args.out = Some(PathBuf::from(value("--out")?)),
            "-h" | "--help" => {
                return Err(format!(
                    "usage: qsynth [--demo {}] [--preset NAME] [--config FILE] [--out FILE] [h0 x1 cnot0,1 ...]",
                    Demo::ALL.map(|d| d.name()).join("|")
                ))
            }
            _ => args.gates.push(arg),
        }
    }
    Ok(args)
}

/// `h0` / `x2` / `cnot0,1` -> gate request
fn parse_gate(token: &str) -> Result<GateRequest, String> {
    let token = token.to_ascii_lowercase();
    let (gate, operands) = if let Some(rest) = token.strip_prefix("cnot") {
        (GateKind::Cnot, rest)
    } else if let Some(rest) = token.strip_prefix('h') {
        (GateKind::H, rest)
    } else if let Some(rest) = token.strip_prefix('x') {
        (GateKind::X, rest)
    } else {
        return Err(format!("Unknown gate '{}'", token));
    };

    let qubits = operands
        .split(',')
        .map(|q| {
            q.trim()
                .parse::<i64>()
                .map_err(|_| format!("Bad qubit '{}' in '{}'", q, token))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GateRequest { gate, qubits })
}

fn load_settings(args: &Args) -> Result<Settings, SynthError> {
    if let Some(path) = &args.config {
        return Settings::load(path);
    }
    match args.preset.as_deref() {
        Some(name) => SynthPreset::from_name(name)
            .map(|p| p.settings())
            .ok_or_else(|| SynthError::InvalidConfig {
                field: "preset",
                reason: format!("unknown preset '{}'", name),
            }),
        None => Ok(Settings::default()),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(&args)?;
    let mut synth = CircuitSynthesizer::new(VoiceTable::shared(), settings)?;

    if let Some(name) = &args.demo {
        synth.load_demo_by_name(name)?;
    }
    for token in &args.gates {
        synth.apply_request(parse_gate(token)?)?;
    }

    let counts = synth.measure()?;
    let track = synth.current_audio()?;
    let path = synth.export_wav(args.out.as_deref())?;

    let report = serde_json::json!({
        "state": synth.current_state().ket(),
        "probabilities": synth.probabilities(),
        "counts": counts.by_bitstring(),
        "summary": synth.summary(),
        "track": track.info(),
        "output": path,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gate_tokens() {
        assert_eq!(
            parse_gate("h0").unwrap(),
            GateRequest {
                gate: GateKind::H,
                qubits: vec![0]
            }
        );
        assert_eq!(
            parse_gate("CNOT0,2").unwrap(),
            GateRequest {
                gate: GateKind::Cnot,
                qubits: vec![0, 2]
            }
        );
        assert!(parse_gate("y1").is_err());
        assert!(parse_gate("xq").is_err());
    }
}
