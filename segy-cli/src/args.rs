//! Command-line surface for the `segy` binary. The argument grammar itself (flag names,
//! single- vs double-dash spelling) is not part of the specification this pipeline implements;
//! only the effect of each flag is. This module renders that effect set as an idiomatic
//! `clap`-derived struct.
use clap::Parser;

/// Filter, transcode, renumber and inject coordinates into a SEG-Y file in a single streaming
/// pass.
#[derive(Parser, Debug)]
#[command(name = "segy", about = "Stream-process a SEG-Y seismic data file", version)]
pub struct Args {
    /// Input file, or `-` for standard input.
    #[arg(short = 'f', long = "input", default_value = "-")]
    pub input: String,

    /// Output file, or `-` for standard output. Omit to run read-only (inspection/scan only).
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Skip this many bytes of the input before reading the reel header.
    #[arg(short = 'x', long = "seek", default_value_t = 0)]
    pub seek: u64,

    /// Do not write the reel header to the output.
    #[arg(long)]
    pub no_header: bool,

    /// Do not stamp the provenance watermark into the EBCDIC block.
    #[arg(long)]
    pub no_ebcdic_stamp: bool,

    /// Byte-swap every registered field on read and write.
    #[arg(long)]
    pub flip_endianess: bool,

    /// Reset both the record and trace ranges to their defaults (equivalent to omitting
    /// `--record`/`--trace`).
    #[arg(long)]
    pub all: bool,

    /// Inclusive field-record-number range to keep: `lo hi`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    pub record: Option<Vec<i64>>,

    /// Inclusive trace-number range to keep: `lo hi`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    pub trace: Option<Vec<i64>>,

    /// Byte offset of the field `--trace` filters against (default: 12,
    /// TRACE_NUMBER_WITHIN_FIELD_RECORD).
    #[arg(long, default_value_t = 12)]
    pub num_trace_offset: usize,

    /// Drop this many leading traces before any other processing.
    #[arg(long, default_value_t = 0)]
    pub skip_n_traces: usize,

    /// Keep at most this many traces after skipping.
    #[arg(long)]
    pub only_n_traces: Option<usize>,

    /// Drop this many leading samples from every trace.
    #[arg(long, default_value_t = 0)]
    pub skip_n_samples: usize,

    /// Keep at most this many samples per trace after skipping.
    #[arg(long)]
    pub only_n_samples: Option<usize>,

    /// Keep only traces where `selector` fields equal their given values: `off:T:v[,...]` or,
    /// with `--use_names`, `name:v[,...]`.
    #[arg(long)]
    pub only_traces_with: Option<String>,

    /// Overwrite reel-header fields before writing: `off:T:v[,...]` or `name:v[,...]`.
    #[arg(long)]
    pub change_header_fields: Option<String>,

    /// Replace the 3200-byte EBCDIC text block with this file's contents.
    #[arg(long)]
    pub ebcdic: Option<String>,

    /// Use symbolic field names instead of `offset:type` in every selector argument.
    #[arg(long)]
    pub use_names: bool,

    /// Per-trace field edits, one line per trace, matched against the output stream in order:
    /// `Rec/Seq/Num = r/s/n : fields = off,T,v; ...`.
    #[arg(long)]
    pub change_trace_fields: Option<String>,

    /// Initial `ORIGINAL_FIELD_RECORD_NUMBER` for renumbering.
    #[arg(long)]
    pub irc: Option<i32>,

    /// Initial `TRACE_NUMBER_WITHIN_FIELD_RECORD` for renumbering.
    #[arg(long)]
    pub itc: Option<i32>,

    /// Inject coordinates from `path`, targeting `SOURCE` or `RECEIVER`: `path,TARGET`.
    #[arg(long)]
    pub add_xy: Option<String>,

    /// Transcode every sample to this format: S(hort16) I(nt32) F(loat32) E(BM float32).
    #[arg(long)]
    pub convert: Option<char>,

    /// Sum consecutive groups of k samples per trace.
    #[arg(long)]
    pub vertical_stack: Option<usize>,

    /// Apply an arithmetic operation to every sample: `+:v`, `-:v`, `*:v`, `/:v`.
    #[arg(long)]
    pub do_op: Option<String>,

    /// Override `NUMBER_OF_DATA_TRACES_PER_RECORD` for renumbering boundaries.
    #[arg(long)]
    pub traces_per_record: Option<i32>,

    /// Override a trace's declared sample count when it reads as zero.
    #[arg(long)]
    pub samples_per_trace: Option<u16>,

    /// Print the reel header summary and exit without processing traces.
    #[arg(long)]
    pub info: bool,

    /// Accumulate and print record/trace/sample-count statistics at end of stream.
    #[arg(long)]
    pub scan: bool,

    /// Dump each trace's header and decoded samples to standard output.
    #[arg(long)]
    pub dump: bool,

    /// Dump only these reel-header fields per `--info`/`--segy_info` call.
    #[arg(long)]
    pub dump_header_fields: Option<String>,

    /// Dump only these trace-header fields with `--dump`.
    #[arg(long)]
    pub dump_trace_fields: Option<String>,

    /// Dump the injected SOURCE or RECEIVER coordinate for every trace.
    #[arg(long)]
    pub dump_xy: Option<String>,

    /// Print each trace's field-record/sequence/trace-number triple as it is processed.
    #[arg(long)]
    pub print_rec_seq_num: bool,

    /// Print a verbose structural summary of the file (reel header plus first/last trace).
    #[arg(long)]
    pub segy_info: bool,

    /// Verbosity level for diagnostics (1=warn, 2=info, 3=debug).
    #[arg(short = 'v', long, default_value_t = 1)]
    pub verbosity: u8,

    /// Render a PostScript wiggle plot: `page,traces_per_cm,scale` (e.g. `A4,10,1.0`).
    #[arg(long)]
    pub do_ps: Option<String>,

    /// Write the PostScript plot to this path instead of `<output>.ps`.
    #[arg(long)]
    pub ps_output: Option<String>,

    /// Hand the result to the interactive viewer collaborator instead of exiting.
    #[arg(long)]
    pub view: bool,
}
