use std::io::{self, Write};

use serde_json::Value;

use super::config::{OutputConfig, OutputFormat};
use super::types::Envelope;

pub trait Presenter: Send + Sync {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()>;
}

/// One envelope per line, or indented when `pretty`.
pub struct JsonPresenter { pub pretty: bool }

impl Presenter for JsonPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        let res = if self.pretty { serde_json::to_writer_pretty(&mut *w, env) } else { serde_json::to_writer(&mut *w, env) };
        res.map_err(io::Error::other)?;
        writeln!(w)
    }
}

/// Header line, then one `key: value` line per top-level field. Arrays
/// show their length; `expand_rows` also lists each element.
pub struct TextPresenter { pub expand_rows: bool }

impl Presenter for TextPresenter {
    fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        match env.duration_ms {
            Some(ms) => writeln!(w, "{} {} ({} ms)", env.op, env.payload.kind(), ms)?,
            None => writeln!(w, "{} {}", env.op, env.payload.kind())?,
        }
        let Value::Object(fields) = env.payload.body() else {
            return writeln!(w, "  {}", scalar(env.payload.body()));
        };
        for (key, value) in fields {
            match value {
                Value::Array(rows) => {
                    writeln!(w, "  {}: {} entries", key, rows.len())?;
                    if self.expand_rows {
                        for row in rows { writeln!(w, "    - {}", row_line(row))?; }
                    }
                }
                other => writeln!(w, "  {}: {}", key, scalar(other))?,
            }
        }
        Ok(())
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row_line(row: &Value) -> String {
    match row {
        Value::Object(map) => map.iter().map(|(k, v)| format!("{}={}", k, scalar(v))).collect::<Vec<_>>().join(" "),
        other => scalar(other),
    }
}

pub struct Emitter {
    presenter: Box<dyn Presenter>,
}

impl Emitter {
    pub fn from_config(cfg: OutputConfig) -> Self {
        let presenter: Box<dyn Presenter> = match cfg.format {
            OutputFormat::Json => Box::new(JsonPresenter { pretty: cfg.pretty }),
            OutputFormat::Text => Box::new(TextPresenter { expand_rows: cfg.pretty }),
        };
        Emitter { presenter }
    }

    pub fn emit(&self, env: &Envelope, w: &mut dyn Write) -> io::Result<()> {
        self.presenter.emit(env, w)?;
        w.flush()
    }
}
