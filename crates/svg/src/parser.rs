use crate::events::SvgEvent;
use crate::geom::{point, vector, ArcFlags};

use core::iter::Peekable;
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

#[derive(Clone, Debug, PartialEq)]
pub struct ParserOptions {
    /// Optionally stop parsing when encountering a provided special character.
    pub stop_at: Option<char>,
}

impl ParserOptions {
    pub const DEFAULT: ParserOptions = ParserOptions { stop_at: None };
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions::DEFAULT
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r' | '\x0C')
}

fn is_command(c: char) -> bool {
    matches!(
        c,
        'M' | 'm'
            | 'L'
            | 'l'
            | 'H'
            | 'h'
            | 'V'
            | 'v'
            | 'C'
            | 'c'
            | 'S'
            | 's'
            | 'Q'
            | 'q'
            | 'T'
            | 't'
            | 'A'
            | 'a'
            | 'Z'
            | 'z'
    )
}

fn starts_number(c: char) -> bool {
    c == '+' || c == '-' || c == '.' || c.is_ascii_digit()
}

// A buffered iterator of characters keeping track of line and column.
pub struct Source<Iter: Iterator<Item = char>> {
    src: Peekable<Iter>,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        Self::with_position(0, 0, src)
    }

    pub fn with_position<IntoIter>(line: i32, column: i32, src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter().peekable();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        let line = line + if current == '\n' { 1 } else { 0 };

        Source {
            current,
            finished,
            src,
            line,
            col: column,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Line and column of the current character.
    pub fn position(&self) -> (i32, i32) {
        (self.line, self.col)
    }

    /// Whether the remaining data is empty or starts with a move-to command.
    ///
    /// Leading whitespace is skipped.
    pub fn initial_command_is_move_to(&mut self) -> bool {
        self.skip_whitespace();
        self.finished || self.current == 'M' || self.current == 'm'
    }

    // The character after the current one.
    fn peek(&mut self) -> Option<char> {
        self.src.peek().cloned()
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && is_space(self.current) {
            self.advance_one();
        }
    }

    // Whitespace, then at most one comma followed by more whitespace.
    fn skip_whitespace_or_delimiter(&mut self) {
        self.skip_whitespace();
        if !self.finished && self.current == ',' {
            self.advance_one();
            self.skip_whitespace();
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

    fn current_digit(&self) -> Option<u32> {
        if self.finished {
            return None;
        }
        self.current.to_digit(10)
    }
}

/// A context object for scanning SVG path data one command at a time.
///
/// A bare number where a command letter is expected repeats the previous command,
/// except that it continues a move-to as a line-to (`M` → `L`, `m` → `l`) and that
/// nothing may follow a close command implicitly.
///
/// ```
/// use vellum_svg::{PathParser, Source, SvgEvent};
/// use vellum_svg::geom::point;
///
/// let mut parser = PathParser::new();
/// let mut src = Source::new("M 0 0 10 0".chars());
/// assert_eq!(parser.parse_segment(&mut src), Ok(Some(SvgEvent::MoveTo(point(0.0, 0.0)))));
/// assert_eq!(parser.parse_segment(&mut src), Ok(Some(SvgEvent::LineTo(point(10.0, 0.0)))));
/// assert_eq!(parser.parse_segment(&mut src), Ok(None));
/// ```
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
    stop_at: Option<char>,
    prev_command: Option<char>,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &ParserOptions) -> Self {
        PathParser {
            stop_at: options.stop_at,
            ..Self::default()
        }
    }

    /// Parses the next command.
    ///
    /// Returns `Ok(None)` at the end of the data or at the stop character.
    pub fn parse_segment<Iter>(
        &mut self,
        src: &mut Source<Iter>,
    ) -> Result<Option<SvgEvent>, ParseError>
    where
        Iter: Iterator<Item = char>,
    {
        src.skip_whitespace();
        if src.finished || self.stop_at == Some(src.current) {
            return Ok(None);
        }

        let c = src.current;
        let (line, column) = src.position();

        let cmd = if is_command(c) {
            src.advance_one();
            c
        } else {
            match self.prev_command {
                Some('M') if starts_number(c) => 'L',
                Some('m') if starts_number(c) => 'l',
                Some(prev) if starts_number(c) && prev != 'Z' && prev != 'z' => prev,
                _ => {
                    return Err(ParseError::Command {
                        command: c,
                        line,
                        column,
                    });
                }
            }
        };

        if self.prev_command.is_none() && cmd != 'M' && cmd != 'm' {
            return Err(ParseError::MissingMoveTo {
                command: cmd,
                line,
                column,
            });
        }
        self.prev_command = Some(cmd);

        let event = match cmd {
            'M' => SvgEvent::MoveTo(point(self.parse_number(src)?, self.parse_number(src)?)),
            'm' => {
                SvgEvent::RelativeMoveTo(vector(self.parse_number(src)?, self.parse_number(src)?))
            }
            'L' => SvgEvent::LineTo(point(self.parse_number(src)?, self.parse_number(src)?)),
            'l' => {
                SvgEvent::RelativeLineTo(vector(self.parse_number(src)?, self.parse_number(src)?))
            }
            'H' => SvgEvent::HorizontalLineTo(self.parse_number(src)?),
            'h' => SvgEvent::RelativeHorizontalLineTo(self.parse_number(src)?),
            'V' => SvgEvent::VerticalLineTo(self.parse_number(src)?),
            'v' => SvgEvent::RelativeVerticalLineTo(self.parse_number(src)?),
            'C' => SvgEvent::CubicTo(
                point(self.parse_number(src)?, self.parse_number(src)?),
                point(self.parse_number(src)?, self.parse_number(src)?),
                point(self.parse_number(src)?, self.parse_number(src)?),
            ),
            'c' => SvgEvent::RelativeCubicTo(
                vector(self.parse_number(src)?, self.parse_number(src)?),
                vector(self.parse_number(src)?, self.parse_number(src)?),
                vector(self.parse_number(src)?, self.parse_number(src)?),
            ),
            'S' => SvgEvent::SmoothCubicTo(
                point(self.parse_number(src)?, self.parse_number(src)?),
                point(self.parse_number(src)?, self.parse_number(src)?),
            ),
            's' => SvgEvent::SmoothRelativeCubicTo(
                vector(self.parse_number(src)?, self.parse_number(src)?),
                vector(self.parse_number(src)?, self.parse_number(src)?),
            ),
            'Q' => SvgEvent::QuadraticTo(
                point(self.parse_number(src)?, self.parse_number(src)?),
                point(self.parse_number(src)?, self.parse_number(src)?),
            ),
            'q' => SvgEvent::RelativeQuadraticTo(
                vector(self.parse_number(src)?, self.parse_number(src)?),
                vector(self.parse_number(src)?, self.parse_number(src)?),
            ),
            'T' => SvgEvent::SmoothQuadraticTo(point(
                self.parse_number(src)?,
                self.parse_number(src)?,
            )),
            't' => SvgEvent::SmoothRelativeQuadraticTo(vector(
                self.parse_number(src)?,
                self.parse_number(src)?,
            )),
            'A' | 'a' => {
                let radii = vector(self.parse_number(src)?, self.parse_number(src)?);
                let x_rotation = self.parse_number(src)?;
                let large_arc = self.parse_flag(src)?;
                let sweep = self.parse_flag(src)?;
                let flags = ArcFlags { large_arc, sweep };
                let x = self.parse_number(src)?;
                let y = self.parse_number(src)?;
                if cmd == 'A' {
                    SvgEvent::ArcTo(radii, x_rotation, flags, point(x, y))
                } else {
                    SvgEvent::RelativeArcTo(radii, x_rotation, flags, vector(x, y))
                }
            }
            // 'Z' | 'z'
            _ => {
                src.skip_whitespace();
                SvgEvent::Close
            }
        };

        Ok(Some(event))
    }

    fn number_error(&mut self, src: &Source<impl Iterator<Item = char>>, line: i32, column: i32) -> ParseError {
        if !src.finished {
            self.float_buffer.push(src.current);
        }
        ParseError::Number {
            src: std::mem::take(&mut self.float_buffer),
            line,
            column,
        }
    }

    // Sign, integer digits, fraction digits, exponent. The digits are accumulated one
    // at a time rather than collected into a string.
    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        let mut sign = 1.0;
        if !src.finished && (src.current == '+' || src.current == '-') {
            if src.current == '-' {
                sign = -1.0;
            }
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        if src.current_digit().is_none() && (src.finished || src.current != '.') {
            return Err(self.number_error(src, line, column));
        }

        let mut integer = 0.0;
        while let Some(digit) = src.current_digit() {
            integer = integer * 10.0 + digit as f64;
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        let mut decimal = 0.0;
        if !src.finished && src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();
            if src.current_digit().is_none() {
                return Err(self.number_error(src, line, column));
            }
            let mut frac = 1.0;
            while let Some(digit) = src.current_digit() {
                frac *= 10.0;
                decimal += digit as f64 / frac;
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        // "1em" and "1ex" are units, not exponents.
        let mut exp: i32 = 0;
        if !src.finished
            && (src.current == 'e' || src.current == 'E')
            && matches!(src.peek(), Some(next) if next != 'x' && next != 'm')
        {
            self.float_buffer.push(src.current);
            src.advance_one();

            let mut exp_sign = 1;
            if src.current == '+' || src.current == '-' {
                if src.current == '-' {
                    exp_sign = -1;
                }
                self.float_buffer.push(src.current);
                src.advance_one();
            }

            if src.current_digit().is_none() {
                return Err(self.number_error(src, line, column));
            }
            while let Some(digit) = src.current_digit() {
                exp = exp.saturating_mul(10).saturating_add(digit as i32);
                self.float_buffer.push(src.current);
                src.advance_one();
            }
            exp *= exp_sign;
        }

        let mut number = (integer + decimal) * sign;
        if exp != 0 {
            number *= 10.0f64.powi(exp);
        }

        // Well formed but out of the range of f64, e.g. "1e999".
        if !number.is_finite() {
            return Err(ParseError::Number {
                src: std::mem::take(&mut self.float_buffer),
                line,
                column,
            });
        }

        src.skip_whitespace_or_delimiter();

        Ok(number)
    }

    fn parse_flag(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<bool, ParseError> {
        src.skip_whitespace();
        let flag = match src.current {
            '1' if !src.finished => true,
            '0' if !src.finished => false,
            _ => {
                return Err(ParseError::Flag {
                    src: src.current,
                    line: src.line,
                    column: src.col,
                });
            }
        };
        src.advance_one();
        src.skip_whitespace_or_delimiter();

        Ok(flag)
    }
}

#[cfg(test)]
fn parse_all(src: &str, options: &ParserOptions) -> Result<Vec<SvgEvent>, ParseError> {
    let mut parser = PathParser::with_options(options);
    let mut src = Source::new(src.chars());
    let mut events = Vec::new();
    while let Some(event) = parser.parse_segment(&mut src)? {
        events.push(event);
    }

    Ok(events)
}

#[test]
fn empty_input() {
    assert_eq!(parse_all("", &ParserOptions::DEFAULT), Ok(Vec::new()));
    assert_eq!(parse_all("  \n ", &ParserOptions::DEFAULT), Ok(Vec::new()));
}

#[test]
fn absolute_square() {
    let events = parse_all("M 0 0 L 1 0 L 1 1 L 0 1 Z", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events,
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::LineTo(point(1.0, 0.0)),
            SvgEvent::LineTo(point(1.0, 1.0)),
            SvgEvent::LineTo(point(0.0, 1.0)),
            SvgEvent::Close,
        ]
    );
}

#[test]
fn implicit_commands() {
    let events = parse_all("M 0 0 1 1,2 2", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events,
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::LineTo(point(1.0, 1.0)),
            SvgEvent::LineTo(point(2.0, 2.0)),
        ]
    );

    let events = parse_all("m1 1 2 2", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events,
        vec![
            SvgEvent::RelativeMoveTo(vector(1.0, 1.0)),
            SvgEvent::RelativeLineTo(vector(2.0, 2.0)),
        ]
    );

    let events = parse_all("M0 0 h 1 2 v-3", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events,
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::RelativeHorizontalLineTo(1.0),
            SvgEvent::RelativeHorizontalLineTo(2.0),
            SvgEvent::RelativeVerticalLineTo(-3.0),
        ]
    );
}

#[test]
fn no_implicit_command_after_close() {
    let mut parser = PathParser::new();
    let mut src = Source::new("M 0 0 Z 1 1".chars());
    assert!(parser.parse_segment(&mut src).unwrap().is_some());
    assert_eq!(parser.parse_segment(&mut src), Ok(Some(SvgEvent::Close)));
    assert_eq!(
        parser.parse_segment(&mut src),
        Err(ParseError::Command {
            command: '1',
            line: 0,
            column: 8
        })
    );

    // An explicit command after a close is fine.
    let events = parse_all("M 0 0 z L 1 1", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn unknown_command_letters() {
    assert_eq!(
        parse_all("M 0 0 x 1", &ParserOptions::DEFAULT),
        Err(ParseError::Command {
            command: 'x',
            line: 0,
            column: 6
        })
    );

    assert_eq!(
        parse_all("\n M 0 \n0 1 1 x 1", &ParserOptions::DEFAULT),
        Err(ParseError::Command {
            command: 'x',
            line: 2,
            column: 6
        })
    );
}

#[test]
fn missing_move_to() {
    assert_eq!(
        parse_all("L 1 1", &ParserOptions::DEFAULT),
        Err(ParseError::MissingMoveTo {
            command: 'L',
            line: 0,
            column: 0
        })
    );

    let mut src = Source::new("".chars());
    assert!(src.initial_command_is_move_to());
    let mut src = Source::new("   m 1 1".chars());
    assert!(src.initial_command_is_move_to());
    let mut src = Source::new("L 1 1".chars());
    assert!(!src.initial_command_is_move_to());
}

#[test]
fn numbers_without_separators() {
    // A second dot starts the next number.
    let events = parse_all("M 0.6.5", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(events, vec![SvgEvent::MoveTo(point(0.6, 0.5))]);

    let events = parse_all("M-1-2", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(events, vec![SvgEvent::MoveTo(point(-1.0, -2.0))]);

    let events = parse_all("M+3 .25", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(events, vec![SvgEvent::MoveTo(point(3.0, 0.25))]);
}

#[test]
fn exponents() {
    let events = parse_all("M 1e-2 -1E3", &ParserOptions::DEFAULT).unwrap();
    match events[0] {
        SvgEvent::MoveTo(p) => {
            assert!((p.x - 0.01).abs() < 1e-15);
            assert_eq!(p.y, -1000.0);
        }
        _ => panic!("{:?}", events),
    }

    let events = parse_all("M 1.5e+1 2", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(events, vec![SvgEvent::MoveTo(point(15.0, 2.0))]);
}

#[test]
fn units_are_not_exponents() {
    let mut parser = PathParser::new();
    let mut src = Source::new("M 0 1em".chars());
    assert_eq!(
        parser.parse_segment(&mut src),
        Ok(Some(SvgEvent::MoveTo(point(0.0, 1.0))))
    );
    assert_eq!(
        parser.parse_segment(&mut src),
        Err(ParseError::Command {
            command: 'e',
            line: 0,
            column: 5
        })
    );
}

#[test]
fn malformed_numbers() {
    let cases = [
        ("M 0 --1", "--"),
        ("M 0 1ee2", "1ee"),
        ("M 0 1e--1", "1e--"),
        ("M 0 *2", "*"),
        ("M 0 .x", ".x"),
        ("M 0 2e 3", "2e "),
    ];
    for (src, bad) in &cases {
        match parse_all(src, &ParserOptions::DEFAULT) {
            Err(ParseError::Number { src: got, line: 0, column: 4 }) => {
                assert_eq!(got, *bad, "{:?}", src)
            }
            r => panic!("{:?} parsed as {:?}", src, r),
        }
    }

    // Running out of input where a number is expected.
    assert!(matches!(
        parse_all("M 0", &ParserOptions::DEFAULT),
        Err(ParseError::Number { .. })
    ));
}

#[test]
fn out_of_range_numbers() {
    assert_eq!(
        parse_all("M 1e999 0", &ParserOptions::DEFAULT),
        Err(ParseError::Number {
            src: "1e999".to_string(),
            line: 0,
            column: 2
        })
    );
    assert_eq!(
        parse_all("M 0 0 L 1 -2E+400", &ParserOptions::DEFAULT),
        Err(ParseError::Number {
            src: "-2E+400".to_string(),
            line: 0,
            column: 10
        })
    );

    let digits = "9".repeat(400);
    assert!(matches!(
        parse_all(&format!("M {} 0", digits), &ParserOptions::DEFAULT),
        Err(ParseError::Number { .. })
    ));

    // Underflow is not an error.
    assert_eq!(
        parse_all("M 1e-999 0", &ParserOptions::DEFAULT),
        Ok(vec![SvgEvent::MoveTo(point(0.0, 0.0))])
    );
}

#[test]
fn number_error_position() {
    assert_eq!(
        parse_all("M 0 --1", &ParserOptions::DEFAULT),
        Err(ParseError::Number {
            src: "--".to_string(),
            line: 0,
            column: 4
        })
    );
}

#[test]
fn arc_flags() {
    let events = parse_all("M0 0a5,5 0 0110,10", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events[1],
        SvgEvent::RelativeArcTo(
            vector(5.0, 5.0),
            0.0,
            ArcFlags {
                large_arc: false,
                sweep: true
            },
            vector(10.0, 10.0)
        )
    );

    let events = parse_all("M0 0 A 5 5 30 1 0 10 10", &ParserOptions::DEFAULT).unwrap();
    assert_eq!(
        events[1],
        SvgEvent::ArcTo(
            vector(5.0, 5.0),
            30.0,
            ArcFlags {
                large_arc: true,
                sweep: false
            },
            point(10.0, 10.0)
        )
    );

    assert_eq!(
        parse_all("M0 0 A 5 5 0 2 0 10 10", &ParserOptions::DEFAULT),
        Err(ParseError::Flag {
            src: '2',
            line: 0,
            column: 13
        })
    );
}

#[test]
fn curves() {
    let events = parse_all(
        "M0 0 C1 2 3 4 5 6 S 7 8 9 10 Q 1 1 2 2 T 3 3 c1 1 2 2 3 3",
        &ParserOptions::DEFAULT,
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            SvgEvent::MoveTo(point(0.0, 0.0)),
            SvgEvent::CubicTo(point(1.0, 2.0), point(3.0, 4.0), point(5.0, 6.0)),
            SvgEvent::SmoothCubicTo(point(7.0, 8.0), point(9.0, 10.0)),
            SvgEvent::QuadraticTo(point(1.0, 1.0), point(2.0, 2.0)),
            SvgEvent::SmoothQuadraticTo(point(3.0, 3.0)),
            SvgEvent::RelativeCubicTo(vector(1.0, 1.0), vector(2.0, 2.0), vector(3.0, 3.0)),
        ]
    );
}

#[test]
fn stop_character_ends_parsing() {
    let options = ParserOptions {
        stop_at: Some('|'),
    };

    assert_eq!(parse_all("M 0 0 | xxxxxx", &options).map(|e| e.len()), Ok(1));
    assert_eq!(parse_all("M 0 0| xxxxxx", &options).map(|e| e.len()), Ok(1));
    assert_eq!(parse_all("| xxxxxx", &options).map(|e| e.len()), Ok(0));
    assert_eq!(parse_all("    | xxxxxx", &options).map(|e| e.len()), Ok(0));
}
