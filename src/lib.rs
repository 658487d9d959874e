#[macro_use]
extern crate log;

#[macro_use]
extern crate lalrpop_util;

pub mod ast;
pub mod config;

pub mod catalog {
    pub mod attribute;
}

pub mod executor {
    pub mod estate;
    pub mod exec_main;
    pub mod exec_procnode;
    pub mod node_append;
    pub mod node_sourcescan;
    pub mod node_twice;
    pub mod node_valuesscan;
    pub mod plan_node;
}

pub mod dest;
pub mod error;
pub mod parser;
pub mod plan;
pub mod spi;
pub mod tuple;
pub mod ty;
