mod rescale;
