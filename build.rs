use std::env;
use std::fs;
use std::path::Path;

// Variables que lee ScannerConfig::from_env() con option_env!
const SCANNER_VARS: &[&str] = &[
    "SCANNER_DECODE_INTERVAL_MS",
    "SCANNER_ANNOTATE_FPS",
    "SCANNER_INDICATOR_INTERVAL_MS",
    "SCANNER_STROKE_COLOR",
    "SCANNER_STROKE_WIDTH",
    "SCANNER_RESULT_INPUT_ID",
];

fn main() {
    // Recompilar si cambia alguna variable del entorno
    for var in SCANNER_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    // Cargar variables desde .env si existe (sin .env se usan los defaults)
    let env_file = Path::new(".env");
    if !env_file.exists() {
        return;
    }
    println!("cargo:rerun-if-changed=.env");

    let Ok(contents) = fs::read_to_string(env_file) else {
        println!("cargo:warning=No se pudo leer .env");
        return;
    };

    for line in contents.lines() {
        // Ignorar comentarios y líneas vacías
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parsear KEY=VALUE
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        if !SCANNER_VARS.contains(&key) {
            println!("cargo:warning=Variable desconocida en .env: {}", key);
            continue;
        }

        // El entorno real tiene prioridad sobre .env
        if env::var(key).is_err() {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
}
