//! Shape of the post-elaboration netlist IR this system consumes. Produced
//! by an external synthesis front-end (out of scope here) — deserialized
//! from its JSON, never constructed by invoking that tool.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
    Inout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bit {
    Index(u64),
    Const(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netname {
    pub bits: Vec<Bit>,
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub port_directions: BTreeMap<String, Direction>,
    #[serde(default)]
    pub connections: BTreeMap<String, Vec<Bit>>,
    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub netnames: BTreeMap<String, Netname>,
    #[serde(default)]
    pub cells: BTreeMap<String, Cell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetlistDocument {
    pub modules: BTreeMap<String, Module>,
}
