//! Integration tests for probing, conversion, and the CLI surface

mod cli_parse;
mod config_layers;
mod dump_convert;
mod probe_run;
mod support;
