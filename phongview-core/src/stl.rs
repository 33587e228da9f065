/// STL import (binary and ASCII) into a single triangle set
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take, take_till},
    character::complete::{multispace0, multispace1},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::SceneError;
use crate::scene::{Material, TriangleSet};

type Corners = [Point3<f32>; 3];

/// Collect facets into a set: corners appended in order, sequential triples.
/// Stored facet normals are ignored; shading derives its own.
fn into_set(facets: Vec<Corners>, material: Material) -> TriangleSet {
    let mut vertices = Vec::with_capacity(facets.len() * 3);
    let mut triangles = Vec::with_capacity(facets.len());
    for corners in facets {
        let base = vertices.len() as u32;
        vertices.extend_from_slice(&corners);
        triangles.push([base, base + 1, base + 2]);
    }
    TriangleSet::new(vertices, triangles, material)
}

fn le_point(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Corners> {
    let (input, _normal) = le_point(input)?;
    let (input, a) = le_point(input)?;
    let (input, b) = le_point(input)?;
    let (input, c) = le_point(input)?;
    let (input, _attributes) = take(2usize)(input)?;
    Ok((input, [a, b, c]))
}

fn binary_stl(input: &[u8]) -> IResult<&[u8], Vec<Corners>> {
    let (input, _header) = take(80usize)(input)?;
    let (input, facet_count) = le_u32(input)?;
    count(binary_facet, facet_count as usize)(input)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8], material: Material) -> Result<TriangleSet, SceneError> {
    if data.len() < 84 {
        return Err(SceneError::Stl("file too small to be a valid STL".to_string()));
    }
    match binary_stl(data) {
        Ok((_, facets)) => Ok(into_set(facets, material)),
        Err(_) => Err(SceneError::Stl("unexpected end of file".to_string())),
    }
}

fn text_point(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    preceded(preceded(multispace0, tag("vertex")), text_point)(input)
}

fn ascii_facet(input: &str) -> IResult<&str, Corners> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = text_point(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_stl(input: &str) -> IResult<&str, Vec<Corners>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = take_till(|c| c == '\n')(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str, material: Material) -> Result<TriangleSet, SceneError> {
    match ascii_stl(input) {
        Ok((_, facets)) => Ok(into_set(facets, material)),
        Err(e) => Err(SceneError::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8], material: Material) -> Result<TriangleSet, SceneError> {
    // binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(set) = parse_ascii_stl(text, material) {
                return Ok(set);
            }
        }
    }
    parse_binary_stl(data, material)
}
