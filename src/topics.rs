use rand::Rng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a newline-delimited topic list, skipping blank lines
pub fn load_topics<P: AsRef<Path>>(path: P) -> Result<Vec<String>, std::io::Error> {
    let reader = BufReader::new(File::open(path)?);
    let mut topics = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let topic = line.trim();
        if !topic.is_empty() {
            topics.push(topic.to_string());
        }
    }
    Ok(topics)
}

/// Pick two distinct topics uniformly at random
pub fn pick_two<R: Rng + ?Sized>(
    topics: &[String],
    rng: &mut R,
) -> Result<(String, String), Box<dyn Error>> {
    let mut distinct: Vec<&String> = Vec::with_capacity(topics.len());
    for topic in topics {
        if !distinct.contains(&topic) {
            distinct.push(topic);
        }
    }
    if distinct.len() < 2 {
        return Err(format!(
            "need at least two distinct topics, found {}",
            distinct.len()
        )
        .into());
    }

    let picked: Vec<&&String> = distinct.choose_multiple(rng, 2).collect();
    Ok((picked[0].to_string(), picked[1].to_string()))
}
