//! Reads the edge list and key list files.
//!
//! Edge list: room count, start room and end room on the first three lines,
//! then one `src,dst,weight` record per line.
//! Key list: one `room,reduction,target,...` record per line.
//! Blank lines are skipped in both.

use crate::graph::{DungeonGraph, GraphError, Room, Weight};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Largest room count accepted from a file. The graph and the path table
/// both hold a full `rooms * rooms` matrix.
pub const MAX_ROOMS: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
    #[error("{file}:{line}: {source}")]
    Graph {
        file: String,
        line: usize,
        #[source]
        source: GraphError,
    },
}

/// A loaded dungeon: the graph plus where the walk starts and ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dungeon {
    pub graph: DungeonGraph,
    pub start: Room,
    pub end: Room,
}

impl Dungeon {
    pub fn load(graph_path: &Path, key_path: &Path) -> Result<Self, LoadError> {
        let graph_text = read(graph_path)?;
        let key_text = read(key_path)?;

        let dungeon = Self::parse_named(
            &graph_path.display().to_string(),
            &graph_text,
            &key_path.display().to_string(),
            &key_text,
        )?;
        info!(
            rooms = dungeon.graph.room_count(),
            edges = dungeon.graph.edges().count(),
            keys = dungeon.graph.key_count(),
            start = dungeon.start,
            end = dungeon.end,
            "dungeon loaded"
        );
        Ok(dungeon)
    }

    pub fn parse(graph_text: &str, key_text: &str) -> Result<Self, LoadError> {
        Self::parse_named("<graph>", graph_text, "<keys>", key_text)
    }

    fn parse_named(
        graph_name: &str,
        graph_text: &str,
        key_name: &str,
        key_text: &str,
    ) -> Result<Self, LoadError> {
        let mut dungeon = parse_edges(&Source::new(graph_name, graph_text))?;
        parse_keys(&Source::new(key_name, key_text), &mut dungeon.graph)?;
        Ok(dungeon)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

struct Source<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> Source<'a> {
    fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Non-blank lines with their 1-based line numbers.
    fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
    }

    fn parse_error(&self, line: usize, message: impl Into<String>) -> LoadError {
        LoadError::Parse {
            file: self.name.to_string(),
            line,
            message: message.into(),
        }
    }

    fn graph_error(&self, line: usize, source: GraphError) -> LoadError {
        LoadError::Graph {
            file: self.name.to_string(),
            line,
            source,
        }
    }

    fn number(&self, line: usize, field: &str, what: &str) -> Result<i64, LoadError> {
        field
            .trim()
            .parse::<i64>()
            .map_err(|_| self.parse_error(line, format!("{} is not an integer: {:?}", what, field.trim())))
    }

    fn room(&self, line: usize, field: &str, what: &str) -> Result<Room, LoadError> {
        let value = self.number(line, field, what)?;
        Room::try_from(value)
            .map_err(|_| self.parse_error(line, format!("{} must not be negative: {}", what, value)))
    }

    fn weight(&self, line: usize, field: &str, what: &str) -> Result<Weight, LoadError> {
        let value = self.number(line, field, what)?;
        Weight::try_from(value)
            .map_err(|_| self.parse_error(line, format!("{} out of range: {}", what, value)))
    }
}

fn parse_edges(source: &Source<'_>) -> Result<Dungeon, LoadError> {
    let mut lines = source.lines();
    let mut header = |what: &str| match lines.next() {
        Some((line, text)) => source.room(line, text, what).map(|value| (line, value)),
        None => Err(source.parse_error(0, format!("missing {}", what))),
    };

    let (rooms_line, rooms) = header("room count")?;
    if rooms > MAX_ROOMS {
        return Err(source.parse_error(
            rooms_line,
            format!("room count {} exceeds the limit of {}", rooms, MAX_ROOMS),
        ));
    }
    let (start_line, start) = header("start room")?;
    let (end_line, end) = header("end room")?;

    let mut graph = DungeonGraph::new(rooms);
    for (line, room) in [(start_line, start), (end_line, end)] {
        if room >= rooms {
            return Err(source.graph_error(line, GraphError::RoomOutOfRange { room, rooms }));
        }
    }

    for (line, text) in lines {
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != 3 {
            return Err(source.parse_error(
                line,
                format!("expected src,dst,weight but found {} fields", fields.len()),
            ));
        }
        let src = source.room(line, fields[0], "source room")?;
        let dst = source.room(line, fields[1], "destination room")?;
        let weight = source.weight(line, fields[2], "weight")?;

        if graph.has_edge(src, dst) {
            return Err(source.parse_error(line, format!("duplicate edge {}->{}", src, dst)));
        }
        graph
            .set_edge(src, dst, weight)
            .map_err(|e| source.graph_error(line, e))?;
    }

    Ok(Dungeon { graph, start, end })
}

fn parse_keys(source: &Source<'_>, graph: &mut DungeonGraph) -> Result<(), LoadError> {
    for (line, text) in source.lines() {
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() < 3 {
            return Err(source.parse_error(line, "expected room,reduction,target[,target...]"));
        }
        let room = source.room(line, fields[0], "key room")?;
        let reduction = source.weight(line, fields[1], "reduction")?;
        let targets = fields[2..]
            .iter()
            .map(|field| source.room(line, field, "target room"))
            .collect::<Result<Vec<_>, _>>()?;

        graph
            .place_key(room, reduction, targets)
            .map_err(|e| source.graph_error(line, e))?;
    }
    Ok(())
}
