//! `segy`: a single-pass streaming filter/transcode/renumber pipeline for SEG-Y seismic data.
mod args;
mod sinks;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use segy_core::enums::{CoordinateTarget, SampleFormatCode};
use segy_core::header::HeaderBuffer;
use segy_io::coordinates::CoordinateTable;
use segy_io::filter::{FilterOptions, Range};
use segy_io::pipeline::{self, ArithOp, Options, TraceSink};
use segy_io::selector;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

fn main() {
    let args = Args::parse();
    init_logger(args.verbosity);

    if let Err(e) = run(&args) {
        eprintln!("segy: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn run(args: &Args) -> Result<()> {
    let mut input = open_input(&args.input, args.seek).with_context(|| format!("opening input {}", args.input))?;

    if args.info {
        let reel = segy_io::read_reel_header(&mut input, args.flip_endianess)
            .context("reading reel header for --info")?;
        print_reel_summary(&reel, args.dump_header_fields.as_deref(), args.use_names)?;
        return Ok(());
    }

    if args.segy_info {
        let reel = segy_io::read_reel_header(&mut input, args.flip_endianess)
            .context("reading reel header for --segy_info")?;
        print_segy_info_summary(&mut input, &reel, args.flip_endianess)?;
        return Ok(());
    }

    let mut opts = build_options(args)?;

    let xy_target = args
        .dump_xy
        .as_deref()
        .map(|w| CoordinateTarget::from_word(w).with_context(|| format!("--dump_xy must be SOURCE or RECEIVER, got `{}`", w)))
        .transpose()?;
    let plot_params = args.do_ps.as_deref().map(sinks::PlotParams::parse).transpose()?;
    let mut sink = sinks::CombinedSink {
        dump: if args.dump || args.print_rec_seq_num || xy_target.is_some() {
            Some(sinks::DumpSink::new(
                args.dump_trace_fields.as_deref(),
                args.use_names,
                args.print_rec_seq_num,
                xy_target,
            )?)
        } else {
            None
        },
        plot: plot_params.as_ref().map(|_| sinks::PlotSink::new()),
    };

    let stats = match &args.output {
        Some(path) => {
            let mut out = open_output(path)?;
            run_with_sink(&mut input, Some(&mut out), &mut opts, &mut sink)?
        }
        None => run_with_sink(&mut input, None::<&mut std::io::Sink>, &mut opts, &mut sink)?,
    };

    if args.scan {
        eprintln!("{}", stats.report());
    }

    if let (Some(params), Some(plot)) = (&plot_params, &sink.plot) {
        let ps_path = args.ps_output.clone().unwrap_or_else(|| format!("{}.ps", args.output.as_deref().unwrap_or("segy")));
        let mut f = BufWriter::new(File::create(&ps_path).with_context(|| format!("creating {}", ps_path))?);
        sinks::write_postscript(&mut f, &plot.traces, params)?;
    }

    if args.view {
        log::info!("handing off to the interactive viewer is outside this pipeline's scope");
    }

    Ok(())
}

/// `--info`: print the reel header (or a selected subset of its fields, via
/// `--dump_header_fields`) and exit without touching a single trace.
fn print_reel_summary(reel: &segy_core::ReelHeader, selector_str: Option<&str>, use_names: bool) -> Result<()> {
    let fields: Vec<segy_core::FieldDescriptor> = match selector_str {
        Some(s) => {
            let selected = selector::parse_selector(s, segy_core::REEL_FIELDS, use_names)
                .context("parsing --dump_header_fields")?;
            selected
                .iter()
                .filter_map(|f| segy_core::registry::by_offset(segy_core::REEL_FIELDS, f.offset))
                .collect()
        }
        None => segy_core::REEL_FIELDS.to_vec(),
    };
    println!("DATA_SAMPLE_FORMAT_CODE = {}", reel.sample_format_code());
    for f in &fields {
        if let Ok(v) = reel.get_at(f.offset, f.kind) {
            println!("{} = {}", f.name, v.as_f64());
        }
    }
    Ok(())
}

/// `--segy_info`: a verbose structural summary distinct from `--info` — every registered reel
/// field, plus the first and last trace's identifying triple, delay time, and sample count.
/// Reads the trace stream directly rather than through the transform pipeline, since this is a
/// read-only inspection of the file as it stands on disk.
fn print_segy_info_summary<R: Read>(input: &mut R, reel: &segy_core::ReelHeader, flip_endianess: bool) -> Result<()> {
    print_reel_summary(reel, None, true)?;

    let format = segy_core::SampleFormatCode::new(reel.sample_format_code());
    let sample_width = format.map(|f| f.sample_size()).unwrap_or(4);

    let mut first: Option<(segy_core::TraceHeader, usize)> = None;
    let mut last: Option<(segy_core::TraceHeader, usize)> = None;
    let mut trace_count = 0u64;

    loop {
        match segy_io::read_trace(input, flip_endianess, sample_width, None) {
            Ok(Some(raw)) => {
                trace_count += 1;
                let n_samples = raw.payload.len() / sample_width;
                if first.is_none() {
                    first = Some((raw.header.clone(), n_samples));
                }
                last = Some((raw.header, n_samples));
            }
            Ok(None) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("total traces = {}", trace_count);
    if let Some((header, n)) = &first {
        print_trace_summary("first trace", header, *n);
    }
    if let Some((header, n)) = &last {
        print_trace_summary("last trace", header, *n);
    }
    Ok(())
}

fn print_trace_summary(label: &str, header: &segy_core::TraceHeader, n_samples: usize) {
    println!(
        "{}: rec={} seq={} num={} delay_time={} samples={}",
        label,
        header.field_record_number(),
        header.trace_sequence_within_reel(),
        header.trace_number_within_record(),
        header.delay_time(),
        n_samples
    );
}

fn run_with_sink<R: Read, W: Write>(
    input: &mut R,
    output: Option<&mut W>,
    opts: &mut Options,
    sink: &mut dyn TraceSink,
) -> Result<pipeline::ScanStats> {
    pipeline::run(input, output, opts, sink).map_err(anyhow::Error::from)
}

fn open_input(path: &str, seek: u64) -> Result<Box<dyn Read>> {
    let mut reader: Box<dyn Read> = if path == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(path).with_context(|| format!("opening {}", path))?)
    };
    if seek > 0 {
        io::copy(&mut reader.by_ref().take(seek), &mut io::sink())?;
    }
    Ok(reader)
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path).with_context(|| format!("creating {}", path))?)))
    }
}

fn build_options(args: &Args) -> Result<Options> {
    let mut opts = Options::default();
    opts.no_header = args.no_header;
    opts.no_ebcdic_stamp = args.no_ebcdic_stamp;
    opts.flip_endianess = args.flip_endianess;
    opts.use_names = args.use_names;

    let mut filter = FilterOptions::default();
    filter.trace_number_offset = args.num_trace_offset;
    if !args.all {
        if let Some(r) = &args.record {
            filter.record_range = Range { lo: r[0], hi: r[1] };
        }
        if let Some(t) = &args.trace {
            filter.trace_range = Range { lo: t[0], hi: t[1] };
        }
    }
    if let Some(sel) = &args.only_traces_with {
        filter.only_traces_with = selector::parse_selector(sel, segy_core::TRACE_FIELDS, args.use_names)
            .context("parsing --only_traces_with")?;
    }
    opts.filter = filter;

    opts.skip_n_traces = args.skip_n_traces;
    opts.only_n_traces = args.only_n_traces;
    opts.skip_n_samples = args.skip_n_samples;
    opts.only_n_samples = args.only_n_samples;

    if let Some(sel) = &args.change_header_fields {
        opts.change_header_fields = selector::parse_selector(sel, segy_core::REEL_FIELDS, args.use_names)
            .context("parsing --change_header_fields")?;
    }
    if let Some(path) = &args.ebcdic {
        opts.ebcdic_text = Some(std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?);
    }

    if let Some(path) = &args.change_trace_fields {
        let file = File::open(path).with_context(|| format!("opening {}", path))?;
        opts.change_trace_records = Some(pipeline::parse_change_file(BufReader::new(file), args.use_names)?);
    }
    if let Some(irc) = args.irc {
        opts.initial_record = irc;
        opts.renumber_records = true;
    }
    if let Some(itc) = args.itc {
        opts.initial_trace = itc;
        opts.renumber_traces = true;
    }
    if let Some(n) = args.traces_per_record {
        opts.traces_per_record = n;
    }

    if let Some(spec) = &args.add_xy {
        let mut parts = spec.splitn(2, ',');
        let path = parts.next().context("--add_xy missing path")?;
        let target_word = parts.next().context("--add_xy missing SOURCE|RECEIVER")?;
        let target = CoordinateTarget::from_word(target_word)
            .with_context(|| format!("--add_xy target must be SOURCE or RECEIVER, got `{}`", target_word))?;
        let file = File::open(path).with_context(|| format!("opening {}", path))?;
        let table = CoordinateTable::parse(BufReader::new(file))?;
        opts.add_xy = Some((table, target));
    }

    if let Some(tag) = args.convert {
        let format = SampleFormatCode::from_convert_tag(&tag.to_string())
            .with_context(|| format!("--convert expects S, I, F or E, got `{}`", tag))?;
        opts.convert_to = Some(format);
    }
    if let Some(k) = args.vertical_stack {
        opts.vertical_stack = k;
    }
    if let Some(spec) = &args.do_op {
        opts.arith_op = Some(parse_arith_op(spec)?);
    }
    opts.samples_per_trace_override = args.samples_per_trace;
    opts.scan = args.scan;

    Ok(opts)
}

fn parse_arith_op(spec: &str) -> Result<ArithOp> {
    let mut parts = spec.splitn(2, ':');
    let op = parts.next().context("--do_op missing operator")?;
    let value: f64 = parts
        .next()
        .context("--do_op missing value")?
        .parse()
        .context("--do_op value must be numeric")?;
    match op {
        "+" => Ok(ArithOp::Add(value)),
        "-" => Ok(ArithOp::Sub(value)),
        "*" => Ok(ArithOp::Mul(value)),
        "/" => Ok(ArithOp::Div(value)),
        _ => anyhow::bail!("--do_op operator must be one of + - * /, got `{}`", op),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("segy").chain(argv.iter().copied()))
    }

    #[test]
    fn do_op_parses_all_operators() {
        assert!(matches!(parse_arith_op("+:1.5").unwrap(), ArithOp::Add(v) if v == 1.5));
        assert!(matches!(parse_arith_op("*:2").unwrap(), ArithOp::Mul(v) if v == 2.0));
    }

    #[test]
    fn do_op_rejects_unknown_operator() {
        assert!(parse_arith_op("%:1").is_err());
    }

    #[test]
    fn build_options_all_resets_ranges_even_with_explicit_bounds() {
        let args = parse(&["--all", "--record", "1", "2"]);
        let opts = build_options(&args).unwrap();
        assert_eq!(opts.filter.record_range.lo, 0);
        assert_eq!(opts.filter.record_range.hi, 99_999_999);
    }

    #[test]
    fn build_options_applies_explicit_record_range() {
        let args = parse(&["--record", "5", "9"]);
        let opts = build_options(&args).unwrap();
        assert_eq!(opts.filter.record_range.lo, 5);
        assert_eq!(opts.filter.record_range.hi, 9);
    }

    #[test]
    fn build_options_convert_tag_maps_to_format() {
        let args = parse(&["--convert", "E"]);
        let opts = build_options(&args).unwrap();
        assert_eq!(opts.convert_to, Some(SampleFormatCode::IbmFloat32));
    }

    #[test]
    fn print_reel_summary_restricts_to_selected_fields() {
        let mut reel = segy_core::ReelHeader::default();
        reel.set_sample_format_code(5);
        assert!(print_reel_summary(&reel, Some("DATA_SAMPLE_FORMAT_CODE"), true).is_ok());
        assert!(print_reel_summary(&reel, None, true).is_ok());
    }

    #[test]
    fn segy_info_summary_scans_first_and_last_trace() {
        let mut reel = segy_core::ReelHeader::default();
        reel.set_sample_format_code(5);

        let mut traces = Vec::new();
        for rec in [1, 2] {
            let mut t = vec![0u8; segy_core::TRACE_HEADER_LEN];
            t[8..12].copy_from_slice(&(rec as i32).to_be_bytes());
            t[114..116].copy_from_slice(&2i16.to_be_bytes());
            t.extend_from_slice(&0.0f32.to_be_bytes());
            t.extend_from_slice(&1.0f32.to_be_bytes());
            traces.extend(t);
        }
        let mut cursor = std::io::Cursor::new(traces);
        assert!(print_segy_info_summary(&mut cursor, &reel, false).is_ok());
    }
}
