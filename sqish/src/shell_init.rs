//! Shell integration printed by `sqish init`.
//!
//! The snippets export a session id, record every command line with
//! `sqish add`, and bind Ctrl-R to a full-screen search whose selection is
//! read back from stderr into the line editor.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
}

const BASH_INIT: &str = r#"export SQISH_SESSION_ID="${SQISH_SESSION_ID:-$(sqish session-id)}"

__sqish_add() {
    local num cmd
    read -r num cmd <<<"$(HISTTIMEFORMAT= builtin history 1)"
    [[ -z "$num" || "$num" == "$__sqish_last" ]] && return
    __sqish_last=$num
    [[ -n "$cmd" ]] && sqish add -- "$cmd"
}

__sqish_search() {
    local selected
    if selected=$(sqish search --query "$READLINE_LINE" 2>&1 >/dev/tty) && [[ -n "$selected" ]]; then
        READLINE_LINE=$selected
        READLINE_POINT=${#selected}
    fi
}

PROMPT_COMMAND="__sqish_add${PROMPT_COMMAND:+;$PROMPT_COMMAND}"
bind -x '"\C-r": __sqish_search'
"#;

const ZSH_INIT: &str = r#"export SQISH_SESSION_ID="${SQISH_SESSION_ID:-$(sqish session-id)}"

__sqish_add() {
    [[ -n "$1" ]] && sqish add -- "$1"
}

__sqish_search() {
    local selected
    if selected=$(sqish search --query "$BUFFER" 2>&1 >/dev/tty) && [[ -n "$selected" ]]; then
        BUFFER=$selected
        CURSOR=${#BUFFER}
    fi
    zle reset-prompt
}

autoload -Uz add-zsh-hook
add-zsh-hook preexec __sqish_add
zle -N __sqish_search
bindkey '^R' __sqish_search
"#;

pub fn init_script(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_INIT,
        Shell::Zsh => ZSH_INIT,
    }
}
