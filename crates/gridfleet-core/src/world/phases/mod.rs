mod assign;
mod completion;
mod movement;
mod spawn;
