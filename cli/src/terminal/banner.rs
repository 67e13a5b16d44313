use colored::*;

use crate::terminal::print;

const BANNER_0: &str = r#"
   ███████╗ ██████╗ ██████╗ ██╗   ██╗████████╗
   ██╔════╝██╔════╝██╔═══██╗██║   ██║╚══██╔══╝
   ███████╗██║     ██║   ██║██║   ██║   ██║
   ╚════██║██║     ██║   ██║██║   ██║   ██║
   ███████║╚██████╗╚██████╔╝╚██████╔╝   ██║
   ╚══════╝ ╚═════╝ ╚═════╝  ╚═════╝    ╚═╝
"#;

const BANNER_1: &str = r#"
     _____ _____ _____ _____ _____
    |   __|     |     |  |  |_   _|
    |__   |   --|  |  |  |  | | |
    |_____|_____|_____|_____| |_|
"#;

const BANNER_2: &str = r#"
    ____ ____ ____ _  _ ___
    [__  |    |  | |  |  |
    ___] |___ |__| |__|  |
"#;

pub fn print() {
    let n: u8 = rand::random_range(0..=2);
    let art: ColoredString = match n {
        0 => BANNER_0.truecolor(120, 200, 255),
        1 => BANNER_1.truecolor(255, 165, 0),
        _ => BANNER_2.green(),
    };
    print::print(&art.to_string());
}
