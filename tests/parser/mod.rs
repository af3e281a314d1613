mod tests_expressions;
mod tests_incremental;
mod tests_insert;
mod tests_lossless;
mod tests_recovery;
mod tests_select;
