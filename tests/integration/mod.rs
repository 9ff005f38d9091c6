mod helpers;
mod test_cli;
mod test_lifecycle;
mod test_lint;
