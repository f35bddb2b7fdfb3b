//! Inspection and plotting consumers of decoded trace data (`--dump`, `--do_ps`). The pipeline
//! itself only knows about the [`segy_io::pipeline::TraceSink`] trait; these are its concrete
//! implementations for the CLI.
use anyhow::{Context, Result};
use segy_core::enums::CoordinateTarget;
use segy_core::header::HeaderBuffer;
use segy_core::TraceHeader;
use segy_io::pipeline::TraceSink;
use segy_io::selector::{self, SelectedField};
use std::io::Write;

/// Prints each trace's header (or a selected subset of its fields) and decoded samples to
/// standard output, one trace per block.
pub struct DumpSink {
    fields: Option<Vec<SelectedField>>,
    print_rec_seq_num: bool,
    xy_target: Option<CoordinateTarget>,
}

impl DumpSink {
    pub fn new(
        selector: Option<&str>,
        use_names: bool,
        print_rec_seq_num: bool,
        xy_target: Option<CoordinateTarget>,
    ) -> Result<Self> {
        let fields = selector
            .map(|s| selector::parse_selector(s, segy_core::TRACE_FIELDS, use_names))
            .transpose()
            .context("parsing --dump_trace_fields selector")?;
        Ok(DumpSink { fields, print_rec_seq_num, xy_target })
    }
}

impl TraceSink for DumpSink {
    fn on_trace(&mut self, header: &TraceHeader, samples: &[f64]) {
        if self.print_rec_seq_num {
            println!(
                "{} {} {}",
                header.field_record_number(),
                header.trace_sequence_within_reel(),
                header.trace_number_within_record()
            );
            return;
        }
        if let Some(target) = self.xy_target {
            let (x_off, y_off) = match target {
                CoordinateTarget::Source => (72, 76),
                CoordinateTarget::Receiver => (80, 84),
            };
            let x = header.get_at(x_off, segy_core::enums::ScalarKind::Integer).map(|v| v.as_f64()).unwrap_or(0.0);
            let y = header.get_at(y_off, segy_core::enums::ScalarKind::Integer).map(|v| v.as_f64()).unwrap_or(0.0);
            println!("{} {} {} {}", header.field_record_number(), header.trace_number_within_record(), x, y);
            return;
        }
        match &self.fields {
            Some(fields) => {
                let values: Vec<String> = fields
                    .iter()
                    .map(|f| match header.get_at(f.offset, f.kind) {
                        Ok(v) => format!("{}={}", f.offset, v.as_f64()),
                        Err(_) => format!("{}=?", f.offset),
                    })
                    .collect();
                println!("{}", values.join(","));
            }
            None => {
                println!(
                    "rec={} seq={} num={} samples={}",
                    header.field_record_number(),
                    header.trace_sequence_within_reel(),
                    header.trace_number_within_record(),
                    samples.len()
                );
            }
        }
    }
}

/// `--do_ps`: `page,traces_per_cm,scale`, e.g. `A4,10,1.0`.
pub struct PlotParams {
    pub page_width_cm: f64,
    pub page_height_cm: f64,
    pub traces_per_cm: f64,
    pub scale: f64,
}

impl PlotParams {
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(',').collect();
        if parts.len() != 3 {
            anyhow::bail!("--do_ps expects `page,traces_per_cm,scale`, got `{}`", spec);
        }
        let (page_width_cm, page_height_cm) = page_size_cm(parts[0])?;
        let traces_per_cm: f64 = parts[1].parse().context("--do_ps traces_per_cm")?;
        let scale: f64 = parts[2].parse().context("--do_ps scale")?;
        Ok(PlotParams { page_width_cm, page_height_cm, traces_per_cm, scale })
    }
}

fn page_size_cm(page: &str) -> Result<(f64, f64)> {
    match page {
        "A0" => Ok((84.1, 118.9)),
        "A1" => Ok((59.4, 84.1)),
        "A2" => Ok((42.0, 59.4)),
        "A3" => Ok((29.7, 42.0)),
        "A4" => Ok((21.0, 29.7)),
        _ => {
            let dims: Vec<&str> = page.splitn(2, 'x').collect();
            if dims.len() != 2 {
                anyhow::bail!("unrecognised page size `{}`", page);
            }
            let w: f64 = dims[0].parse().context("page width")?;
            let h: f64 = dims[1].parse().context("page height")?;
            Ok((w, h))
        }
    }
}

/// Collects decoded sample traces for the final PostScript render.
pub struct PlotSink {
    pub traces: Vec<Vec<f64>>,
}

impl PlotSink {
    pub fn new() -> Self {
        PlotSink { traces: Vec::new() }
    }
}

impl TraceSink for PlotSink {
    fn on_trace(&mut self, _header: &TraceHeader, samples: &[f64]) {
        self.traces.push(samples.to_vec());
    }
}

/// Fans a trace out to whichever inspection/plot sinks the CLI invocation asked for.
#[derive(Default)]
pub struct CombinedSink {
    pub dump: Option<DumpSink>,
    pub plot: Option<PlotSink>,
}

impl TraceSink for CombinedSink {
    fn on_trace(&mut self, header: &TraceHeader, samples: &[f64]) {
        if let Some(d) = &mut self.dump {
            d.on_trace(header, samples);
        }
        if let Some(p) = &mut self.plot {
            p.on_trace(header, samples);
        }
    }
}

const POINTS_PER_CM: f64 = 28.3465;

/// Write a minimal PostScript wiggle-trace plot: each trace is a vertical lane, each sample a
/// horizontally deflected line segment scaled by `params.scale`.
pub fn write_postscript<W: Write>(out: &mut W, traces: &[Vec<f64>], params: &PlotParams) -> std::io::Result<()> {
    let width_pt = params.page_width_cm * POINTS_PER_CM;
    let height_pt = params.page_height_cm * POINTS_PER_CM;
    let lane_width_pt = POINTS_PER_CM / params.traces_per_cm.max(0.01);

    writeln!(out, "%!PS-Adobe-3.0")?;
    writeln!(out, "%%BoundingBox: 0 0 {:.0} {:.0}", width_pt, height_pt)?;
    writeln!(out, "%%Pages: 1")?;
    writeln!(out, "%%EndComments")?;
    writeln!(out, "0.5 setlinewidth")?;

    let max_amplitude = traces
        .iter()
        .flat_map(|t| t.iter().copied())
        .fold(1.0_f64, |acc, v| acc.max(v.abs()))
        .max(1e-9);

    for (i, trace) in traces.iter().enumerate() {
        let lane_x = (i as f64 + 0.5) * lane_width_pt;
        if lane_x > width_pt {
            break;
        }
        let n = trace.len().max(1);
        let step_y = height_pt / n as f64;
        writeln!(out, "newpath")?;
        writeln!(out, "{:.2} {:.2} moveto", lane_x, height_pt)?;
        for (j, &s) in trace.iter().enumerate() {
            let y = height_pt - (j as f64) * step_y;
            let dx = (s / max_amplitude) * (lane_width_pt / 2.0) * params.scale;
            writeln!(out, "{:.2} {:.2} lineto", lane_x + dx, y)?;
        }
        writeln!(out, "stroke")?;
    }

    writeln!(out, "showpage")?;
    writeln!(out, "%%EOF")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_params_parses_named_page() {
        let p = PlotParams::parse("A4,10,1.0").unwrap();
        assert!((p.page_width_cm - 21.0).abs() < 1e-9);
        assert_eq!(p.traces_per_cm, 10.0);
    }

    #[test]
    fn plot_params_parses_custom_page() {
        let p = PlotParams::parse("30x40,5,2.0").unwrap();
        assert_eq!(p.page_width_cm, 30.0);
        assert_eq!(p.page_height_cm, 40.0);
    }

    #[test]
    fn plot_params_rejects_malformed_spec() {
        assert!(PlotParams::parse("A4,10").is_err());
    }

    #[test]
    fn dump_sink_prints_xy_target_coordinates() {
        let mut sink = DumpSink::new(None, false, false, Some(CoordinateTarget::Source)).unwrap();
        let header = TraceHeader::default();
        sink.on_trace(&header, &[]);
    }

    #[test]
    fn postscript_output_is_well_formed() {
        let mut out = Vec::new();
        let params = PlotParams::parse("A4,10,1.0").unwrap();
        write_postscript(&mut out, &[vec![0.0, 1.0, -1.0]], &params).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("%!PS-Adobe-3.0"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}
