//! Serialising vellum paths to SVG path data.

use crate::path::{Path, PathItem};

/// Output options of [`write_path_data`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Number of fractional digits coordinates are rounded to.
    pub precision: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions { precision: 5 }
    }
}

/// Serialise an item to SVG path data: an absolute `M` per sub-path,
/// relative `l`/`h`/`v` for straight curves, relative `c` otherwise, and a
/// single trailing `z` closing each closed sub-path.
pub fn write_path_data(item: &PathItem, options: &WriterOptions) -> String {
    let mut out = String::new();
    for path in item.child_paths() {
        write_path(&mut out, path, options.precision);
    }
    out
}

fn write_path(out: &mut String, path: &Path, precision: usize) {
    if path.is_empty() {
        return;
    }
    let first = path.segments()[0].point;
    out.push('M');
    fmt_pair(out, first.x, first.y, precision);

    let count = path.curve_count();
    for i in 0..count {
        let v = path.curve_values(i);
        let straight = v.ctrl1 == v.from && v.ctrl2 == v.to;
        // The closing curve of a closed path is implied by `z` when it is
        // straight.
        if path.is_closed() && i + 1 == count && straight {
            break;
        }
        let d = v.to - v.from;
        if straight {
            if d.y == 0.0 {
                out.push('h');
                fmt_num(out, d.x, precision);
            } else if d.x == 0.0 {
                out.push('v');
                fmt_num(out, d.y, precision);
            } else {
                out.push('l');
                fmt_pair(out, d.x, d.y, precision);
            }
        } else {
            let c1 = v.ctrl1 - v.from;
            let c2 = v.ctrl2 - v.from;
            out.push('c');
            fmt_pair(out, c1.x, c1.y, precision);
            out.push(' ');
            fmt_pair(out, c2.x, c2.y, precision);
            out.push(' ');
            fmt_pair(out, d.x, d.y, precision);
        }
    }
    if path.is_closed() {
        out.push('z');
    }
}

fn fmt_pair(out: &mut String, x: f64, y: f64, precision: usize) {
    fmt_num(out, x, precision);
    out.push(',');
    fmt_num(out, y, precision);
}

// Round to the requested precision and drop the trailing fractional
// zeros.
fn fmt_num(out: &mut String, value: f64, precision: usize) {
    let scale = 10f64.powi(precision as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        out.push('0');
        return;
    }
    let s = format!("{:.*}", precision, rounded);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        &s
    };
    out.push_str(s);
}
