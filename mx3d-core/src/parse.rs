/// Text parsers for colors and matrix literals
use nalgebra::Matrix3;
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::{char, multispace0, space0, space1},
    combinator::{all_consuming, map_res, opt, value},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::ParseError;
use crate::geometry::Rgb;

/// Parse a `#rrggbb` color (the leading `#` is optional)
pub fn parse_color(input: &str) -> Result<Rgb, ParseError> {
    all_consuming(delimited(multispace0, hex_color, multispace0))(input)
        .map(|(_, color)| color)
        .map_err(|_| ParseError::Color(input.to_string()))
}

/// Parse a row-major matrix literal such as `1 0 0; 0 1 0; 0 0 1`.
///
/// Cells may be separated by whitespace or commas, rows by `;`.
pub fn parse_matrix(input: &str) -> Result<Matrix3<f32>, ParseError> {
    all_consuming(delimited(multispace0, matrix3, multispace0))(input)
        .map(|(_, m)| m)
        .map_err(|_| ParseError::Matrix(input.to_string()))
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    let (input, _) = opt(char('#'))(input)?;
    let (input, (r, g, b)) = tuple((hex_byte, hex_byte, hex_byte))(input)?;
    Ok((input, Rgb::new(r, g, b)))
}

fn cell_separator(input: &str) -> IResult<&str, ()> {
    alt((value((), tuple((space0, char(','), space0))), value((), space1)))(input)
}

fn row_separator(input: &str) -> IResult<&str, ()> {
    value((), tuple((space0, char(';'), space0)))(input)
}

fn row(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, a) = preceded(space0, float)(input)?;
    let (input, b) = preceded(cell_separator, float)(input)?;
    let (input, c) = preceded(cell_separator, float)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [a, b, c]))
}

fn matrix3(input: &str) -> IResult<&str, Matrix3<f32>> {
    let (input, r0) = row(input)?;
    let (input, r1) = preceded(row_separator, row)(input)?;
    let (input, r2) = preceded(row_separator, row)(input)?;
    Ok((
        input,
        Matrix3::new(
            r0[0], r0[1], r0[2], //
            r1[0], r1[1], r1[2], //
            r2[0], r2[1], r2[2],
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#3b82f6").unwrap(), Rgb::new(0x3b, 0x82, 0xf6));
        assert_eq!(parse_color("FFFFFF").unwrap(), Rgb::new(255, 255, 255));
        assert!(parse_color("#3b82f").is_err());
        assert!(parse_color("#3b82f6ff").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("1 2 3; 4 5 6; 7 8 9").unwrap();
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(2, 2)], 9.0);

        let m = parse_matrix("  1, 0.5, 0 ;0,1,0; 0 0 -1 ").unwrap();
        assert_eq!(m[(0, 1)], 0.5);
        assert_eq!(m[(2, 2)], -1.0);
    }

    #[test]
    fn test_parse_matrix_rejects_wrong_shape() {
        assert!(parse_matrix("1 0 0; 0 1 0").is_err());
        assert!(parse_matrix("1 0; 0 1; 0 0").is_err());
        assert!(parse_matrix("1 0 0 0; 0 1 0; 0 0 1").is_err());
        assert!(matches!(parse_matrix("identity"), Err(ParseError::Matrix(_))));
    }
}
