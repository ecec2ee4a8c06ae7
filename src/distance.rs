/// Levenshtein distance between `a` and `b`, every edit costing 1.
///
/// Runs a single rolling row sized by the shorter input, so memory stays
/// O(min(len(a), len(b))).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.is_empty() {
        return longer.len();
    }

    let n = shorter.len();
    let mut row: Vec<usize> = (0..=n).collect();

    for (i, &lc) in longer.iter().enumerate() {
        // row[j - 1] before it gets overwritten
        let mut diagonal = row[0];
        row[0] = i + 1;

        for j in 1..=n {
            let above = row[j];
            let cost = if lc == shorter[j - 1] { 0 } else { 1 };
            let del = above + 1;
            let ins = row[j - 1] + 1;
            let sub = diagonal + cost;
            row[j] = del.min(ins).min(sub);
            diagonal = above;
        }
    }
    row[n]
}
