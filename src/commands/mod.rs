pub mod generate;
pub mod inputs;
pub mod lint;
pub mod matrix;
pub mod params;
pub mod paths;
pub mod scenarios;

pub use generate::GenerateCommand;
pub use inputs::InputsCommand;
pub use lint::LintCommand;
pub use matrix::MatrixCommand;
pub use params::ParamsCommand;
pub use paths::PathsCommand;
pub use scenarios::ScenariosCommand;
