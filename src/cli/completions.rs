use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    appctl completions bash > ~/.bash_completion.d/appctl\n\n\
                  Generate zsh completions:\n    appctl completions zsh > ~/.zfunc/_appctl\n\n\
                  Generate fish completions:\n    appctl completions fish > ~/.config/fish/completions/appctl.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
