#[derive(Debug)]
pub enum GSError {
    Generic(String),
    ReadFile(String, String),
    CreateFile(String, String),
    WriteFile(String, String),
    LoadGraph(String),
    GraphParse(String, usize, String),
    Config(String),
    NotLoaded,
    NotConverged(usize, u64),
    Worker(String),
    Timely(String),
    Serialize(String, String),
    Deserialize(String, String),
    ResultsMismatch,
}

impl std::fmt::Display for GSError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GSError::Generic(msg) => write!(f, "[GSError] {}", msg)?,
            GSError::ReadFile(file_path, e) => {
                write!(f, "[IOError] Could not open file '{}' for reading: {}", file_path, e)?;
            }
            GSError::CreateFile(file_path, e) => {
                write!(f, "[IOError] Could not create file '{}' for writing: {}", file_path, e)?;
            }
            GSError::WriteFile(file_path, e) => {
                write!(f, "[IOError] Could not write to '{}': {}", file_path, e)?;
            }
            GSError::LoadGraph(message) => write!(f, "[LoadGraphError] {}", message)?,
            GSError::GraphParse(value, line, file) => write!(
                f,
                "[LoadGraphError] Could not parse '{}' as a node id at line {} in file '{}'",
                value, line, file
            )?,
            GSError::Config(message) => write!(f, "[ConfigError] {}", message)?,
            GSError::NotLoaded => {
                write!(f, "[ComputationError] No edges have been loaded into the engine")?;
            }
            GSError::NotConverged(rounds, new_pairs) => write!(
                f,
                "[ComputationError] No convergence after {} rounds ({} new pairs in last round)",
                rounds, new_pairs
            )?,
            GSError::Worker(message) => write!(f, "[RuntimeError] {}", message)?,
            GSError::Timely(message) => write!(f, "[TimelyError] {}", message)?,
            GSError::Serialize(name, e) => {
                write!(f, "[SerdeError] Could not serialize '{}': {}", name, e)?;
            }
            GSError::Deserialize(name, e) => {
                write!(f, "[SerdeError] Could not deserialize '{}': {}", name, e)?;
            }
            GSError::ResultsMismatch => write!(f, "[ComputationError] Results do not match")?,
        }
        Ok(())
    }
}

impl std::error::Error for GSError {}
