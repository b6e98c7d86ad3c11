//! An SVG path-data parser producing vellum paths.

use crate::math::{point, vector, Point};
use crate::path::{CompoundPath, Path, PathItem};

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: Expected number, got {src:?}.")]
    Number { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Expected flag (0/1), got {src:?}.")]
    Flag { src: char, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Invalid command {command:?}.")]
    Command {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Expected move-to command, got {command:?}.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },
}

// A buffered iterator of characters keeping track of line and column.
struct Source<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();
        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };
        let line = if current == '\n' { 1 } else { 0 };
        Source {
            src,
            current,
            line,
            col: 0,
            finished,
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }
}

#[derive(Default)]
struct PathParser {
    float_buffer: String,
    current_position: Point,
    subpath_start: Point,
    paths: Vec<Path>,
    current: Option<Path>,
}

/// Parse SVG path data into a path item: one `Path` per sub-path, wrapped
/// in a `CompoundPath` when there are several.
///
/// Degenerate input (repeated points, zero-length commands) is preserved
/// verbatim as segments.
pub fn parse_path_data(data: &str) -> Result<PathItem, ParseError> {
    let mut src = Source::new(data.chars());
    let mut parser = PathParser::default();
    parser.parse(&mut src)?;
    let mut paths = parser.paths;
    if let Some(p) = parser.current.take() {
        if !p.is_empty() {
            paths.push(p);
        }
    }
    Ok(match paths.len() {
        0 => PathItem::Path(Path::new()),
        1 => PathItem::Path(paths.pop().unwrap()),
        _ => PathItem::Compound(CompoundPath::with_children(paths)),
    })
}

impl PathParser {
    fn parse(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<(), ParseError> {
        // Per-spec: "If a relative moveto (m) appears as the first element
        // of the path, then it is treated as a pair of absolute
        // coordinates."
        self.current_position = point(0.0, 0.0);

        let mut prev_cubic_ctrl: Option<Point> = None;
        let mut prev_quadratic_ctrl: Option<Point> = None;
        let mut implicit_cmd = 'M';
        // After a close, a command other than a move starts a new sub-path
        // at the closed sub-path's starting point.
        let mut after_close = false;

        src.skip_whitespace();

        while !src.finished {
            let mut cmd = src.current;
            let cmd_line = src.line;
            let cmd_col = src.col;

            if cmd.is_ascii_alphabetic() {
                src.advance_one();
            } else if matches!(implicit_cmd, 'z' | 'Z') {
                // A close command takes no arguments and cannot repeat
                // implicitly.
                return Err(ParseError::Command {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            } else {
                cmd = implicit_cmd;
            }

            if self.current.is_none() && !after_close && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }
            if after_close && cmd != 'm' && cmd != 'M' && cmd != 'z' && cmd != 'Z' {
                self.begin_subpath(self.current_position);
            }
            after_close = false;

            let is_relative = cmd.is_lowercase();

            match cmd {
                'm' | 'M' => {
                    let to = self.parse_endpoint(is_relative, src)?;
                    self.begin_subpath(to);
                    self.subpath_start = to;
                    implicit_cmd = if is_relative { 'l' } else { 'L' };
                }
                'l' | 'L' => {
                    let to = self.parse_endpoint(is_relative, src)?;
                    self.line_to(to);
                }
                'h' | 'H' => {
                    let mut x = self.parse_number(src)?;
                    if is_relative {
                        x += self.current_position.x;
                    }
                    let to = point(x, self.current_position.y);
                    self.current_position = to;
                    self.line_to(to);
                }
                'v' | 'V' => {
                    let mut y = self.parse_number(src)?;
                    if is_relative {
                        y += self.current_position.y;
                    }
                    let to = point(self.current_position.x, y);
                    self.current_position = to;
                    self.line_to(to);
                }
                'c' | 'C' => {
                    let ctrl1 = self.parse_point(is_relative, src)?;
                    let ctrl2 = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    self.cubic_to(ctrl1, ctrl2, to);
                }
                's' | 'S' => {
                    let ctrl1 = self.smooth_ctrl(prev_cubic_ctrl);
                    let ctrl2 = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    self.cubic_to(ctrl1, ctrl2, to);
                }
                'q' | 'Q' => {
                    let ctrl = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    self.quadratic_to(ctrl, to);
                }
                't' | 'T' => {
                    let ctrl = self.smooth_ctrl(prev_quadratic_ctrl);
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    self.quadratic_to(ctrl, to);
                }
                'a' | 'A' => {
                    let rx = self.parse_number(src)?;
                    let ry = self.parse_number(src)?;
                    let rotation = self.parse_number(src)?;
                    let large_arc = self.parse_flag(src)?;
                    let sweep = self.parse_flag(src)?;
                    let from = self.current_position;
                    let to = self.parse_endpoint(is_relative, src)?;
                    self.arc_to(from, rx, ry, rotation.to_radians(), large_arc, sweep, to);
                }
                'z' | 'Z' => {
                    if let Some(mut p) = self.current.take() {
                        p.close_path(0.0);
                        self.paths.push(p);
                    }
                    self.current_position = self.subpath_start;
                    after_close = true;
                }
                _ => {
                    return Err(ParseError::Command {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            if !matches!(cmd, 'c' | 'C' | 's' | 'S') {
                prev_cubic_ctrl = None;
            }
            if !matches!(cmd, 'q' | 'Q' | 't' | 'T') {
                prev_quadratic_ctrl = None;
            }
            implicit_cmd = match cmd {
                'm' => 'l',
                'M' => 'L',
                other => other,
            };

            src.skip_whitespace();
        }

        Ok(())
    }

    fn begin_subpath(&mut self, at: Point) {
        if let Some(p) = self.current.take() {
            if !p.is_empty() {
                self.paths.push(p);
            }
        }
        let mut path = Path::new();
        path.move_to(at).expect("empty path accepts move_to");
        self.subpath_start = at;
        self.current_position = at;
        self.current = Some(path);
    }

    fn line_to(&mut self, to: Point) {
        let path = self.current.as_mut().expect("checked for move_to");
        let _ = path.line_to(to);
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let path = self.current.as_mut().expect("checked for move_to");
        let _ = path.cubic_curve_to(ctrl1, ctrl2, to);
    }

    fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        let path = self.current.as_mut().expect("checked for move_to");
        let _ = path.quadratic_curve_to(ctrl, to);
    }

    fn smooth_ctrl(&self, prev: Option<Point>) -> Point {
        match prev {
            // Reflect the previous control point across the current point.
            Some(prev) => self.current_position + (self.current_position - prev),
            None => self.current_position,
        }
    }

    fn parse_point(
        &mut self,
        relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let x = self.parse_number(src)?;
        let y = self.parse_number(src)?;
        let p = point(x, y);
        Ok(if relative {
            p + self.current_position.to_vector()
        } else {
            p
        })
    }

    fn parse_endpoint(
        &mut self,
        relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let p = self.parse_point(relative, src)?;
        self.current_position = p;
        Ok(p)
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        src.skip_whitespace();
        let line = src.line;
        let column = src.col;
        self.float_buffer.clear();

        if !src.finished && (src.current == '+' || src.current == '-') {
            self.float_buffer.push(src.current);
            src.advance_one();
        }
        let mut seen_digit = false;
        let mut seen_dot = false;
        while !src.finished {
            let c = src.current;
            if c.is_ascii_digit() {
                seen_digit = true;
            } else if c == '.' && !seen_dot {
                seen_dot = true;
            } else {
                break;
            }
            self.float_buffer.push(c);
            src.advance_one();
        }
        if seen_digit && !src.finished && (src.current == 'e' || src.current == 'E') {
            self.float_buffer.push('e');
            src.advance_one();
            if !src.finished && (src.current == '+' || src.current == '-') {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
            let mut exp_digit = false;
            while !src.finished && src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
                exp_digit = true;
            }
            if !exp_digit {
                seen_digit = false;
            }
        }

        if !seen_digit {
            return Err(ParseError::Number {
                src: if self.float_buffer.is_empty() {
                    src.current.to_string()
                } else {
                    self.float_buffer.clone()
                },
                line,
                column,
            });
        }
        self.float_buffer.parse().map_err(|_| ParseError::Number {
            src: self.float_buffer.clone(),
            line,
            column,
        })
    }

    fn parse_flag(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<bool, ParseError> {
        src.skip_whitespace();
        let (line, column) = (src.line, src.col);
        let c = src.current;
        if src.finished || (c != '0' && c != '1') {
            return Err(ParseError::Flag {
                src: c,
                line,
                column,
            });
        }
        src.advance_one();
        Ok(c == '1')
    }

    // The SVG implementation-notes centre parameterisation (F.6.5),
    // emitting one cubic per slice of at most a quarter turn.
    #[allow(clippy::too_many_arguments)]
    fn arc_to(
        &mut self,
        from: Point,
        rx: f64,
        ry: f64,
        phi: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) {
        if from == to {
            return;
        }
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx == 0.0 || ry == 0.0 {
            self.line_to(to);
            return;
        }

        let (sinp, cosp) = phi.sin_cos();
        let half = (from - to) * 0.5;
        let x1p = cosp * half.x + sinp * half.y;
        let y1p = -sinp * half.x + cosp * half.y;

        // Scale the radii up when they cannot span the endpoints.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
        let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let mid = from.lerp(to, 0.5);
        let center = point(
            cosp * cxp - sinp * cyp + mid.x,
            sinp * cxp + cosp * cyp + mid.y,
        );

        let theta1 = ((y1p - cyp) / ry).atan2((x1p - cxp) / rx);
        let theta2 = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
        let tau = 2.0 * std::f64::consts::PI;
        let mut delta = (theta2 - theta1) % tau;
        if !sweep && delta > 0.0 {
            delta -= tau;
        } else if sweep && delta < 0.0 {
            delta += tau;
        }

        let count = (delta.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
        let step = delta / count as f64;
        let h = (4.0 / 3.0) * (step / 4.0).tan();

        let ellipse_point = |theta: f64| {
            let (sint, cost) = theta.sin_cos();
            point(
                center.x + cosp * rx * cost - sinp * ry * sint,
                center.y + sinp * rx * cost + cosp * ry * sint,
            )
        };
        let ellipse_tangent = |theta: f64| {
            let (sint, cost) = theta.sin_cos();
            vector(
                -cosp * rx * sint - sinp * ry * cost,
                -sinp * rx * sint + cosp * ry * cost,
            )
        };

        for i in 0..count {
            let ta = theta1 + step * i as f64;
            let tb = ta + step;
            let pa = ellipse_point(ta);
            let pb = if i + 1 == count { to } else { ellipse_point(tb) };
            let ctrl1 = pa + ellipse_tangent(ta) * h;
            let ctrl2 = pb - ellipse_tangent(tb) * h;
            self.cubic_to(ctrl1, ctrl2, pb);
        }
        self.current_position = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_segment_fixture() {
        let item = parse_path_data(
            "M100,300l0,-50l50,-50l-50,0l150,0l-150,0l50,0l-50,0l100,0l-100,0l0,-100l200,0l0,200z",
        )
        .unwrap();
        let path = match item {
            PathItem::Path(p) => p,
            PathItem::Compound(_) => panic!("expected a single path"),
        };
        assert!(path.is_closed());
        assert_eq!(path.segment_count(), 13);
        let expected = [
            (100.0, 300.0),
            (100.0, 250.0),
            (150.0, 200.0),
            (100.0, 200.0),
            (250.0, 200.0),
            (100.0, 200.0),
            (150.0, 200.0),
            (100.0, 200.0),
            (200.0, 200.0),
            (100.0, 200.0),
            (100.0, 100.0),
            (300.0, 100.0),
            (300.0, 300.0),
        ];
        for (segment, &(x, y)) in path.segments().iter().zip(expected.iter()) {
            assert_eq!(segment.point, point(x, y));
        }
    }

    #[test]
    fn absolute_and_relative_cubics() {
        let item = parse_path_data("M10,20C20,20 30,40 40,40c10,0 20,-20 30,-20").unwrap();
        let path = match item {
            PathItem::Path(p) => p,
            _ => panic!(),
        };
        assert_eq!(path.segment_count(), 3);
        assert_eq!(path.segments()[1].point, point(40.0, 40.0));
        assert_eq!(path.segments()[2].point, point(70.0, 20.0));
        assert_eq!(path.segments()[0].handle_out, point(20.0, 20.0) - point(10.0, 20.0));
        assert_eq!(path.segments()[1].handle_in, point(30.0, 40.0) - point(40.0, 40.0));
    }

    #[test]
    fn quadratic_becomes_exact_cubic() {
        let item = parse_path_data("M0,0Q30,60 60,0").unwrap();
        let path = match item {
            PathItem::Path(p) => p,
            _ => panic!(),
        };
        // The equivalent cubic control points sit at two thirds of the way
        // to the quadratic control point.
        assert_eq!(path.segments()[0].handle_out, vector(20.0, 40.0));
        assert_eq!(path.segments()[1].handle_in, vector(-20.0, 40.0));
    }

    #[test]
    fn smooth_cubic_reflects_the_previous_control() {
        let item = parse_path_data("M0,0C10,10 20,10 30,0S50,-10 60,0").unwrap();
        let path = match item {
            PathItem::Path(p) => p,
            _ => panic!(),
        };
        // The reflected control of (20,10) across (30,0) is (40,-10).
        assert_eq!(path.segments()[1].handle_out, vector(10.0, -10.0));
    }

    #[test]
    fn multiple_subpaths() {
        let item = parse_path_data("M0,0h10v10h-10zM100,100h5v5z").unwrap();
        match item {
            PathItem::Compound(c) => {
                assert_eq!(c.children().len(), 2);
                assert!(c.children().iter().all(|p| p.is_closed()));
            }
            _ => panic!("expected a compound path"),
        }
    }

    #[test]
    fn arcs_approximate_the_circle() {
        let item = parse_path_data("M0,0A50,50 0 0 1 100,0").unwrap();
        let path = match item {
            PathItem::Path(p) => p,
            _ => panic!(),
        };
        assert!(path.segment_count() >= 3);
        // Points of the arc stay at radius 50 around (50, 0).
        for i in 0..path.curve_count() {
            let v = path.curve_values(i);
            for step in 0..=4 {
                let p = v.sample(step as f64 / 4.0);
                let r = (p - point(50.0, 0.0)).length();
                assert!((r - 50.0).abs() < 0.1, "{:?}", p);
            }
        }
        assert_eq!(path.last_segment().unwrap().point, point(100.0, 0.0));
    }

    #[test]
    fn errors_carry_positions() {
        assert!(matches!(
            parse_path_data("L10,10"),
            Err(ParseError::MissingMoveTo { .. })
        ));
        assert!(matches!(
            parse_path_data("M10,x"),
            Err(ParseError::Number { .. })
        ));
        assert!(matches!(
            parse_path_data("M0,0A10,10 0 2 0 5,5"),
            Err(ParseError::Flag { .. })
        ));
        assert!(matches!(
            parse_path_data("M0,0y5,5"),
            Err(ParseError::Command { .. })
        ));
    }
}
