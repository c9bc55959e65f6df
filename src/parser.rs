/// Split a raw line into the command segments joined by `parallel_op`.
///
/// Every occurrence of the operator splits, including leading and trailing
/// ones. Blank pieces are dropped here, so `"a & & b &"` yields two segments
/// and a line made only of operators and whitespace yields none.
pub fn split_line(line: &str, parallel_op: char) -> Vec<&str> {
    line.split(parallel_op)
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}
